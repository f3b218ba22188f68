// ── Domain model ──
//
// Plain data produced by the stat sources and the probes. Everything
// here is `Clone + Serialize` so the CLI can print it and the dashboard
// can hold it behind an `Arc`.

mod health;
mod snapshot;

pub use health::{HealthCheck, HealthChecks, ProbeOutcome};
pub use snapshot::{
    CpuStats, DiskIo, DiskStats, InterfaceStats, LoadAverage, MemoryUsage, NamespaceSummary,
    PartitionUsage, Snapshot, UsageStat,
};
