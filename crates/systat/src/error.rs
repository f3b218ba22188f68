//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use systat_config::ConfigError;
use systat_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const CLUSTER: i32 = 4;
    pub const DNS: i32 = 5;
    pub const UNSUPPORTED: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(systat::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid domain '{domain}': {reason}")]
    #[diagnostic(
        code(systat::invalid_domain),
        help("Pass a hostname such as example.com (labels of letters, digits and '-').")
    )]
    InvalidDomain { domain: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(systat::config),
        help("Check the file with: systat config path")
    )]
    Config(#[from] ConfigError),

    #[error("No usable kubeconfig: {reason}")]
    #[diagnostic(
        code(systat::kubeconfig),
        help("Pass --kubeconfig, set KUBECONFIG, or set `kubeconfig` in the config file.")
    )]
    Kubeconfig { reason: String },

    // ── Remote services ──────────────────────────────────────────────
    #[error("Kubernetes cluster unreachable")]
    #[diagnostic(
        code(systat::cluster_unreachable),
        help("Check that the API server in your kubeconfig is running and reachable.")
    )]
    ClusterUnreachable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("DNS query for {domain} via {server} failed: {reason}")]
    #[diagnostic(
        code(systat::dns),
        help("Try another resolver with --server, e.g. --server 1.1.1.1")
    )]
    Dns {
        domain: String,
        server: String,
        reason: String,
    },

    // ── Platform ─────────────────────────────────────────────────────
    #[error("{feature} is not supported on this platform")]
    #[diagnostic(code(systat::unsupported))]
    Unsupported { feature: String },

    // ── Everything else ──────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(systat::core))]
    Core(CoreError),

    #[error("Dashboard failed: {reason}")]
    #[diagnostic(code(systat::dashboard))]
    Dashboard { reason: String },

    #[error("Failed to render output: {reason}")]
    #[diagnostic(code(systat::render))]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::InvalidDomain { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Kubeconfig { .. } => exit_code::CONFIG,
            Self::ClusterUnreachable { .. } => exit_code::CLUSTER,
            Self::Dns { .. } => exit_code::DNS,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Core(_) | Self::Dashboard { .. } | Self::Render { .. } | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidDomain { domain, reason } => Self::InvalidDomain { domain, reason },
            CoreError::InvalidRecordType(value) => Self::Validation {
                field: "--type".into(),
                reason: format!("unsupported record type '{value}'"),
            },
            CoreError::ClusterConfigMissing { .. } | CoreError::ClusterConfigInvalid { .. } => {
                Self::Kubeconfig {
                    reason: err.to_string(),
                }
            }
            CoreError::Cluster(source) => Self::ClusterUnreachable {
                source: Box::new(source),
            },
            CoreError::Dns {
                domain,
                server,
                reason,
            } => Self::Dns {
                domain,
                server,
                reason,
            },
            CoreError::Unsupported { feature } => Self::Unsupported { feature },
            other => Self::Core(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render {
            reason: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render {
            reason: err.to_string(),
        }
    }
}
