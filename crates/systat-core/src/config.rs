// ── Runtime monitoring configuration ──
//
// These types describe *what* the dashboard watches and how often.
// They never touch disk: `systat-config` builds a `MonitorConfig` from
// the TOML file and CLI overrides and hands it in.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Resolver used by the `dns` command when nothing else is configured.
pub const DEFAULT_DNS_SERVER: &str = "10.0.0.1:53";

/// Hostnames resolved by the dashboard's DNS health checks.
pub const DEFAULT_DNS_CHECKS: [&str; 2] = ["runtime.uds.dev", "keycloak.admin.uds.dev"];

/// Addresses pinged by the dashboard's reachability health checks.
pub const DEFAULT_PING_CHECKS: [&str; 1] = ["10.0.0.1"];

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(1);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Parsed form of [`DEFAULT_DNS_SERVER`].
pub fn default_dns_server() -> SocketAddr {
    SocketAddr::from(([10, 0, 0, 1], 53))
}

/// The kind of reachability check behind a health entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Hostname resolution succeeds.
    Dns,
    /// One ICMP echo round-trip completes.
    Ping,
}

/// A named health check: what to probe and how.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeTarget {
    pub kind: ProbeKind,
    pub host: String,
}

impl ProbeTarget {
    pub fn dns(host: impl Into<String>) -> Self {
        Self {
            kind: ProbeKind::Dns,
            host: host.into(),
        }
    }

    pub fn ping(host: impl Into<String>) -> Self {
        Self {
            kind: ProbeKind::Ping,
            host: host.into(),
        }
    }

    /// Display name and identity of the health entry.
    ///
    /// DNS checks are named by their host, echo checks `ping <host>`.
    pub fn name(&self) -> String {
        match self.kind {
            ProbeKind::Dns => self.host.clone(),
            ProbeKind::Ping => format!("ping {}", self.host),
        }
    }
}

/// Everything the refresh loop needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Tick period of the aggregator.
    pub refresh_interval: Duration,
    /// Upper bound on every individual probe.
    pub probe_timeout: Duration,
    /// Health checks in display order.
    pub probes: Vec<ProbeTarget>,
    /// Explicit kubeconfig; `None` uses the standard search order.
    pub kubeconfig: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let probes = DEFAULT_DNS_CHECKS
            .iter()
            .map(|h| ProbeTarget::dns(*h))
            .chain(DEFAULT_PING_CHECKS.iter().map(|h| ProbeTarget::ping(*h)))
            .collect();

        Self {
            refresh_interval: DEFAULT_REFRESH,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            probes,
            kubeconfig: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_probes_keep_configured_order() {
        let cfg = MonitorConfig::default();
        let names: Vec<String> = cfg.probes.iter().map(ProbeTarget::name).collect();
        assert_eq!(
            names,
            vec!["runtime.uds.dev", "keycloak.admin.uds.dev", "ping 10.0.0.1"]
        );
    }

    #[test]
    fn default_dns_server_matches_constant() {
        let parsed: SocketAddr = DEFAULT_DNS_SERVER.parse().unwrap();
        assert_eq!(parsed, default_dns_server());
    }

    #[test]
    fn default_cadence_is_one_second() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.refresh_interval, Duration::from_secs(1));
        assert_eq!(cfg.probe_timeout, Duration::from_secs(1));
    }
}
