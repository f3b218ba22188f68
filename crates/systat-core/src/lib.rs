//! Data layer behind the `systat` CLI and dashboard.
//!
//! - **Stat sources** ([`source`]): one adapter per domain (CPU, memory,
//!   disk, network, cluster namespaces) behind the [`StatSource`] trait.
//!   A failed fetch means "no data this tick", never a crash.
//!
//! - **Probes** ([`probe`]): DNS and echo reachability checks that
//!   resolve on their own schedule and report a boolean.
//!
//! - **[`Aggregator`]**: the cancellable refresh loop. Each tick joins
//!   all sources into one [`Snapshot`] and publishes it whole; probe
//!   results stream alongside as separate [`Update`]s.
//!
//! - **Reports** ([`report`]): one-shot collectors for the CLI
//!   commands, which propagate errors instead of swallowing them.

pub mod aggregator;
pub mod cluster;
pub mod config;
pub mod error;
pub mod model;
pub mod probe;
pub mod procfs;
pub mod report;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregator::{Aggregator, Update};
pub use config::{MonitorConfig, ProbeKind, ProbeTarget};
pub use error::CoreError;
pub use model::{
    HealthCheck, HealthChecks, InterfaceStats, LoadAverage, NamespaceSummary, PartitionUsage,
    ProbeOutcome, Snapshot, UsageStat,
};
pub use probe::{HostLookup, Prober, SystemLookup, SystemProber};
pub use source::{Domain, Sources, StatSource};
