use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{DiskIo, PartitionUsage};
use crate::source::{DiskBackend, Partition, SystemDisks, collect_disk_stats};

#[derive(Debug, Clone, Serialize)]
pub struct DiskReport {
    pub partitions: Vec<Partition>,
    pub usage: Vec<PartitionUsage>,
    pub io_counters: BTreeMap<String, DiskIo>,
}

fn collect(backend: &dyn DiskBackend) -> Result<DiskReport, CoreError> {
    let partitions = backend.partitions()?;
    let stats = collect_disk_stats(backend)?;
    Ok(DiskReport {
        partitions,
        usage: stats.usage.into_values().collect(),
        io_counters: stats.io,
    })
}

/// Every mounted partition, its usage, and device I/O counters.
/// Unreadable mounts are left out of `usage`.
pub async fn disk_report() -> Result<DiskReport, CoreError> {
    tokio::task::spawn_blocking(|| collect(&SystemDisks)).await?
}
