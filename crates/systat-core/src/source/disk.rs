use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;
use sysinfo::Disks;
use tracing::debug;

use super::{Domain, StatSource};
use crate::error::CoreError;
use crate::model::{DiskIo, DiskStats, PartitionUsage, UsageStat};

/// A mounted filesystem as enumerated by the OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub device: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
    pub kind: String,
    pub removable: bool,
    pub read_only: bool,
}

/// The three disk queries the source composes. Split out so tests can
/// stand in for the OS.
pub trait DiskBackend: Send + Sync + 'static {
    fn partitions(&self) -> Result<Vec<Partition>, CoreError>;

    fn usage(&self, mount: &Path) -> Result<UsageStat, CoreError>;

    fn io_counters(&self) -> Result<BTreeMap<String, DiskIo>, CoreError>;
}

/// Enumerate partitions and read each one's usage and the device I/O
/// counters.
///
/// A mount whose usage cannot be read is skipped; so are I/O counters
/// when the platform has none. Only a failed enumeration fails the
/// whole call.
pub fn collect_disk_stats(backend: &dyn DiskBackend) -> Result<DiskStats, CoreError> {
    let partitions = backend.partitions()?;

    let mut usage = BTreeMap::new();
    for part in partitions {
        match backend.usage(&part.mount_point) {
            Ok(stat) => {
                let mount = part.mount_point.display().to_string();
                usage.insert(
                    mount.clone(),
                    PartitionUsage {
                        device: part.device,
                        mount_point: mount,
                        fs_type: part.fs_type,
                        usage: stat,
                    },
                );
            }
            Err(e) => {
                debug!(mount = %part.mount_point.display(), error = %e, "skipping mount point");
            }
        }
    }

    let io = backend.io_counters().unwrap_or_else(|e| {
        debug!(error = %e, "disk I/O counters unavailable");
        BTreeMap::new()
    });

    Ok(DiskStats { usage, io })
}

// ── OS backend ──────────────────────────────────────────────────────

/// Partitions from `sysinfo`, usage from `statvfs`, counters from
/// `/proc/diskstats`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDisks;

impl DiskBackend for SystemDisks {
    fn partitions(&self) -> Result<Vec<Partition>, CoreError> {
        let disks = Disks::new_with_refreshed_list();
        let partitions: Vec<Partition> = disks
            .list()
            .iter()
            .map(|d| Partition {
                device: d.name().to_string_lossy().into_owned(),
                mount_point: d.mount_point().to_path_buf(),
                fs_type: d.file_system().to_string_lossy().into_owned(),
                kind: format!("{:?}", d.kind()),
                removable: d.is_removable(),
                read_only: d.is_read_only(),
            })
            .collect();
        if partitions.is_empty() {
            return Err(CoreError::unavailable("disk", "no mounted partitions found"));
        }
        Ok(partitions)
    }

    fn usage(&self, mount: &Path) -> Result<UsageStat, CoreError> {
        let stats = fs2::statvfs(mount).map_err(|source| CoreError::DiskUsage {
            mount: mount.to_path_buf(),
            source,
        })?;
        let total = stats.total_space();
        Ok(UsageStat::new(total.saturating_sub(stats.free_space()), total))
    }

    fn io_counters(&self) -> Result<BTreeMap<String, DiskIo>, CoreError> {
        if cfg!(target_os = "linux") {
            let content = std::fs::read_to_string("/proc/diskstats")?;
            Ok(crate::procfs::parse_diskstats(&content))
        } else {
            Err(CoreError::Unsupported {
                feature: "disk I/O counters".into(),
            })
        }
    }
}

// ── Source ──────────────────────────────────────────────────────────

pub struct DiskSource<B> {
    backend: Arc<B>,
}

impl<B: DiskBackend> DiskSource<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }
}

impl<B: DiskBackend> StatSource for DiskSource<B> {
    type Output = DiskStats;

    fn domain(&self) -> Domain {
        Domain::Disk
    }

    fn fetch(&self) -> BoxFuture<'_, Result<DiskStats, CoreError>> {
        let backend = Arc::clone(&self.backend);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || collect_disk_stats(backend.as_ref())).await?
        })
    }
}
