// ── Stat source adapters ──
//
// One adapter per dashboard domain. Each fetch is a read-only query of
// live OS or cluster state; blocking system calls run on the blocking
// pool so the caller's task never stalls.

mod cluster;
mod cpu;
mod disk;
mod memory;
mod network;

use std::collections::BTreeMap;
use std::path::Path;

use futures_util::future::BoxFuture;
use strum::{Display, EnumString};
use tracing::info;

use crate::error::CoreError;
use crate::model::{CpuStats, DiskStats, InterfaceStats, MemoryUsage, NamespaceSummary};

pub use cluster::ClusterSource;
pub use cpu::{CpuSource, load_average};
pub use disk::{DiskBackend, DiskSource, Partition, SystemDisks, collect_disk_stats};
pub use memory::MemorySource;
pub use network::{NetworkSource, interface_drops};

pub(crate) use cluster::namespace_summary;

#[cfg(test)]
pub(crate) use disk::tests::FakeDisks;

/// The domains a snapshot is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Domain {
    Cpu,
    Memory,
    Disk,
    Network,
    Cluster,
}

/// A single-domain stat provider.
///
/// `fetch` returns an error when the domain cannot be read right now.
/// Callers treat that as "no data this tick", never as fatal.
pub trait StatSource: Send + Sync {
    type Output: Send;

    fn domain(&self) -> Domain;

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Output, CoreError>>;
}

pub type BoxSource<T> = Box<dyn StatSource<Output = T>>;

/// The full adapter set the aggregator fans out over.
pub struct Sources {
    pub cpu: BoxSource<CpuStats>,
    pub memory: BoxSource<MemoryUsage>,
    pub disk: BoxSource<DiskStats>,
    pub network: BoxSource<BTreeMap<String, InterfaceStats>>,
    /// `None` once the cluster adapter is disabled for the session.
    pub cluster: Option<BoxSource<Vec<NamespaceSummary>>>,
}

impl Sources {
    /// Adapters backed by the local machine and, when a kubeconfig can
    /// be loaded, the cluster it points at.
    ///
    /// The first sysinfo samples are taken on the blocking pool while
    /// the cluster connection is attempted.
    pub async fn system(kubeconfig: Option<&Path>) -> Result<Self, CoreError> {
        let local = tokio::task::spawn_blocking(|| (CpuSource::new(), NetworkSource::new()));
        let (local, cluster) = tokio::join!(local, ClusterSource::connect(kubeconfig));
        let (cpu, network) = local?;

        let cluster = match cluster {
            Ok(source) => Some(Box::new(source) as BoxSource<Vec<NamespaceSummary>>),
            Err(e) => {
                info!(error = %e, "cluster source disabled");
                None
            }
        };

        Ok(Self {
            cpu: Box::new(cpu),
            memory: Box::new(MemorySource),
            disk: Box::new(DiskSource::new(SystemDisks)),
            network: Box::new(network),
            cluster,
        })
    }
}

impl CoreError {
    /// Errors that will not clear up on their own within a session.
    pub fn disables_source(&self) -> bool {
        matches!(
            self,
            Self::ClusterConfigMissing { .. } | Self::ClusterConfigInvalid { .. }
        )
    }
}
