use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Used/total pair with a precomputed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageStat {
    pub used: u64,
    pub total: u64,
    pub used_percent: f64,
}

impl UsageStat {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn new(used: u64, total: u64) -> Self {
        let used_percent = if total == 0 {
            0.0
        } else {
            used as f64 / total as f64 * 100.0
        };
        Self {
            used,
            total,
            used_percent,
        }
    }

    pub fn free(&self) -> u64 {
        self.total.saturating_sub(self.used)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Output of the CPU source: per-core utilisation and load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuStats {
    /// Percent busy per logical core since the previous sample.
    pub per_core: Vec<f64>,
    /// `None` where the platform has no load average.
    pub load: Option<LoadAverage>,
}

/// Output of the memory source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub ram: UsageStat,
    pub swap: UsageStat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionUsage {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    #[serde(flatten)]
    pub usage: UsageStat,
}

/// Cumulative block device counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiskIo {
    pub read_count: u64,
    pub write_count: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_time_ms: u64,
    pub write_time_ms: u64,
    pub io_time_ms: u64,
}

/// Output of the disk source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiskStats {
    /// Keyed by mount point.
    pub usage: BTreeMap<String, PartitionUsage>,
    /// Keyed by block device name.
    pub io: BTreeMap<String, DiskIo>,
}

/// Cumulative counters and IPv4 bindings of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceStats {
    pub name: String,
    pub mac: String,
    pub ipv4: Vec<Ipv4Addr>,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
}

impl InterfaceStats {
    pub fn ipv4_list(&self) -> String {
        self.ipv4
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSummary {
    pub name: String,
    pub phase: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl NamespaceSummary {
    pub fn is_active(&self) -> bool {
        self.phase.as_deref() == Some("Active")
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// Every domain's stats from one aggregator tick.
///
/// A domain is `None` when its source failed (or is disabled) on that
/// tick. All populated domains come from the same tick's fetches.
///
/// Health checks are not part of a snapshot. They arrive separately as
/// `Update::Probe` and are tracked in [`HealthChecks`](super::HealthChecks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub taken_at: DateTime<Utc>,
    pub cpu: Option<Vec<f64>>,
    pub load: Option<LoadAverage>,
    pub memory: Option<UsageStat>,
    pub swap: Option<UsageStat>,
    pub disk: Option<BTreeMap<String, PartitionUsage>>,
    pub disk_io: Option<BTreeMap<String, DiskIo>>,
    pub network: Option<BTreeMap<String, InterfaceStats>>,
    pub namespaces: Option<Vec<NamespaceSummary>>,
}

impl Snapshot {
    /// The placeholder shown before the first tick publishes.
    pub fn empty() -> Self {
        Self {
            tick: 0,
            taken_at: Utc::now(),
            cpu: None,
            load: None,
            memory: None,
            swap: None,
            disk: None,
            disk_io: None,
            network: None,
            namespaces: None,
        }
    }

    /// Mounted partitions, fullest first. Ties fall back to mount point.
    pub fn disks_by_usage(&self) -> Vec<&PartitionUsage> {
        let mut disks: Vec<&PartitionUsage> =
            self.disk.iter().flat_map(BTreeMap::values).collect();
        disks.sort_by(|a, b| {
            b.usage
                .used_percent
                .total_cmp(&a.usage.used_percent)
                .then_with(|| a.mount_point.cmp(&b.mount_point))
        });
        disks
    }

    pub fn interfaces(&self) -> Vec<&InterfaceStats> {
        self.network.iter().flat_map(BTreeMap::values).collect()
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceStats> {
        self.network.as_ref().and_then(|n| n.get(name))
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
