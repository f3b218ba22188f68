// ── Core error types ──
//
// Errors raised by stat sources, probes and the one-shot report
// collectors. Dashboard adapters never surface these to the user: the
// aggregator logs them and publishes the domain as absent. The CLI maps
// them onto exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── System sources ───────────────────────────────────────────────
    #[error("{domain} stats unavailable: {reason}")]
    SourceUnavailable { domain: String, reason: String },

    #[error("cannot read usage for mount point {mount}: {source}")]
    DiskUsage {
        mount: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("{feature} is not supported on this platform")]
    Unsupported { feature: String },

    // ── Cluster ──────────────────────────────────────────────────────
    #[error("no kubeconfig found (tried {tried})")]
    ClusterConfigMissing { tried: String },

    #[error("invalid kubeconfig {path}: {reason}")]
    ClusterConfigInvalid { path: PathBuf, reason: String },

    #[error("cluster API request failed: {0}")]
    Cluster(#[from] kube::Error),

    // ── DNS ──────────────────────────────────────────────────────────
    #[error("invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("unsupported record type '{0}'")]
    InvalidRecordType(String),

    #[error("DNS query for {domain} via {server} failed: {reason}")]
    Dns {
        domain: String,
        server: String,
        reason: String,
    },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn unavailable(domain: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            domain: domain.into(),
            reason: reason.to_string(),
        }
    }
}
