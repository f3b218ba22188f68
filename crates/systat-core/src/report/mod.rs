// ── One-shot reports ──
//
// Collectors behind the CLI's single-shot commands. Unlike the
// dashboard sources these propagate failures: the caller prints the
// error and exits non-zero.

pub mod cluster;
pub mod disk;
pub mod dns;
pub mod metrics;
pub mod network;
pub mod process;
pub mod system;

pub use cluster::{ClusterReport, NodeSummary, PodSummary, cluster_report};
pub use disk::{DiskReport, disk_report};
pub use dns::{DnsAnswer, DnsRecord, dns_query, parse_record_type, validate_domain};
pub use metrics::{MetricsReport, metrics_report};
pub use network::{Link, NetworkReport, network_report};
pub use process::{ProcessInfo, process_report};
pub use system::{SystemReport, system_report};
