use futures_util::future::BoxFuture;
use sysinfo::System;

use super::{Domain, StatSource};
use crate::error::CoreError;
use crate::model::{MemoryUsage, UsageStat};

/// Physical memory and swap totals.
pub struct MemorySource;

fn read_memory() -> MemoryUsage {
    let mut sys = System::new();
    sys.refresh_memory();
    // "used" counts what applications cannot reclaim, not cache.
    let ram_used = sys.total_memory().saturating_sub(sys.available_memory());
    MemoryUsage {
        ram: UsageStat::new(ram_used, sys.total_memory()),
        swap: UsageStat::new(sys.used_swap(), sys.total_swap()),
    }
}

impl StatSource for MemorySource {
    type Output = MemoryUsage;

    fn domain(&self) -> Domain {
        Domain::Memory
    }

    fn fetch(&self) -> BoxFuture<'_, Result<MemoryUsage, CoreError>> {
        Box::pin(async move {
            let usage = tokio::task::spawn_blocking(read_memory).await?;
            if usage.ram.total == 0 {
                return Err(CoreError::unavailable("memory", "total memory reported as zero"));
            }
            Ok(usage)
        })
    }
}
