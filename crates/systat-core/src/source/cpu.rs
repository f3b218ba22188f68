use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use sysinfo::System;

use super::{Domain, StatSource};
use crate::error::CoreError;
use crate::model::{CpuStats, LoadAverage};

/// Per-core utilisation since the previous fetch, plus load average.
///
/// Holds its `System` across fetches: utilisation is a delta between
/// two refreshes.
pub struct CpuSource {
    sys: Arc<Mutex<System>>,
}

impl CpuSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        Self {
            sys: Arc::new(Mutex::new(sys)),
        }
    }
}

impl Default for CpuSource {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_average() -> Option<LoadAverage> {
    if cfg!(windows) {
        return None;
    }
    let load = System::load_average();
    Some(LoadAverage {
        one: load.one,
        five: load.five,
        fifteen: load.fifteen,
    })
}

impl StatSource for CpuSource {
    type Output = CpuStats;

    fn domain(&self) -> Domain {
        Domain::Cpu
    }

    fn fetch(&self) -> BoxFuture<'_, Result<CpuStats, CoreError>> {
        let sys = Arc::clone(&self.sys);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let mut sys = sys
                    .lock()
                    .map_err(|_| CoreError::unavailable("cpu", "sampler lock poisoned"))?;
                sys.refresh_cpu_usage();
                let per_core = sys
                    .cpus()
                    .iter()
                    .map(|c| f64::from(c.cpu_usage()))
                    .collect();
                Ok(CpuStats {
                    per_core,
                    load: load_average(),
                })
            })
            .await?
        })
    }
}
