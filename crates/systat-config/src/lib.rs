//! Shared configuration for the systat CLI and dashboard.
//!
//! A TOML file under the platform config directory, layered under
//! `SYSTAT_`-prefixed environment variables, translated into
//! [`systat_core::MonitorConfig`] for the dashboard and a resolver
//! address for the `dns` command. Every key has a default, so a missing
//! file is never an error.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use systat_core::config::{
    DEFAULT_DNS_CHECKS, DEFAULT_DNS_SERVER, DEFAULT_PING_CHECKS, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_REFRESH,
};
use systat_core::{MonitorConfig, ProbeTarget};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by the CLI and the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Kubeconfig to use instead of the standard search order.
    pub kubeconfig: Option<PathBuf>,

    /// Global output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// `dns` command settings.
    #[serde(default)]
    pub dns: DnsSettings,

    /// Dashboard refresh and health checks.
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    /// "yaml", "json" or "table".
    #[serde(default = "default_output")]
    pub output: String,

    /// "auto", "always" or "never".
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "yaml".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DnsSettings {
    /// Resolver as `ip:port`.
    #[serde(default = "default_dns_server")]
    pub server: String,
}

impl Default for DnsSettings {
    fn default() -> Self {
        Self {
            server: default_dns_server(),
        }
    }
}

fn default_dns_server() -> String {
    DEFAULT_DNS_SERVER.into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardSettings {
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Hostnames whose resolution is checked each tick.
    #[serde(default = "default_dns_checks")]
    pub dns_checks: Vec<String>,

    /// Hosts pinged each tick.
    #[serde(default = "default_ping_checks")]
    pub ping_checks: Vec<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            dns_checks: default_dns_checks(),
            ping_checks: default_ping_checks(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH.as_millis() as u64
}
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT.as_millis() as u64
}
fn default_dns_checks() -> Vec<String> {
    DEFAULT_DNS_CHECKS.iter().map(ToString::to_string).collect()
}
fn default_ping_checks() -> Vec<String> {
    DEFAULT_PING_CHECKS.iter().map(ToString::to_string).collect()
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Resolver for the `dns` command.
    pub fn dns_server(&self) -> Result<SocketAddr, ConfigError> {
        parse_dns_server(&self.dns.server)
    }

    /// Dashboard settings as the refresh loop consumes them.
    pub fn monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let dash = &self.dashboard;
        if dash.refresh_ms == 0 {
            return Err(ConfigError::Validation {
                field: "dashboard.refresh_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if dash.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "dashboard.probe_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }

        let probes = dash
            .dns_checks
            .iter()
            .map(ProbeTarget::dns)
            .chain(dash.ping_checks.iter().map(ProbeTarget::ping))
            .collect();

        Ok(MonitorConfig {
            refresh_interval: Duration::from_millis(dash.refresh_ms),
            probe_timeout: Duration::from_millis(dash.probe_timeout_ms),
            probes,
            kubeconfig: self.kubeconfig.clone(),
        })
    }
}

/// Accepts `ip:port` or a bare IP, which gets port 53.
pub fn parse_dns_server(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .parse::<SocketAddr>()
        .or_else(|_| {
            value
                .parse::<std::net::IpAddr>()
                .map(|ip| SocketAddr::new(ip, 53))
        })
        .map_err(|_| ConfigError::Validation {
            field: "dns.server".into(),
            reason: format!("'{value}' is not an IP address or ip:port"),
        })
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "systat", "systat")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for the dashboard's log files.
pub fn log_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("systat");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from an explicit file path, then the environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SYSTAT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Render the effective configuration as TOML.
pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.defaults.output, "yaml");
        assert_eq!(cfg.dns.server, "10.0.0.1:53");
        assert_eq!(cfg.dashboard.refresh_ms, 1000);
        assert_eq!(
            cfg.dashboard.dns_checks,
            vec!["runtime.uds.dev", "keycloak.admin.uds.dev"]
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
kubeconfig = "/srv/kube.yaml"

[defaults]
output = "json"

[dns]
server = "1.1.1.1"

[dashboard]
refresh_ms = 2500
ping_checks = ["192.168.1.1", "192.168.1.254"]
"#,
        );

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.dns_server().unwrap(), "1.1.1.1:53".parse().unwrap());

        let monitor = cfg.monitor_config().unwrap();
        assert_eq!(monitor.refresh_interval, Duration::from_millis(2500));
        assert_eq!(monitor.kubeconfig, Some(PathBuf::from("/srv/kube.yaml")));
        let names: Vec<String> = monitor.probes.iter().map(ProbeTarget::name).collect();
        assert_eq!(
            names,
            vec![
                "runtime.uds.dev",
                "keycloak.admin.uds.dev",
                "ping 192.168.1.1",
                "ping 192.168.1.254",
            ]
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let (_dir, path) = write_config("[dashboard\nrefresh_ms = ");
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn zero_refresh_is_rejected() {
        let mut cfg = Config::default();
        cfg.dashboard.refresh_ms = 0;
        let err = cfg.monitor_config().unwrap_err();
        assert!(err.to_string().contains("dashboard.refresh_ms"));
    }

    #[test]
    fn default_monitor_config_matches_core_defaults() {
        let monitor = Config::default().monitor_config().unwrap();
        assert_eq!(monitor, MonitorConfig::default());
    }

    #[test]
    fn dns_server_accepts_socket_or_ip() {
        assert_eq!(
            parse_dns_server("10.0.0.1:5353").unwrap(),
            "10.0.0.1:5353".parse().unwrap()
        );
        assert_eq!(
            parse_dns_server("::1").unwrap(),
            "[::1]:53".parse().unwrap()
        );
        assert!(parse_dns_server("dns.example").is_err());
    }

    #[test]
    fn effective_config_round_trips_through_toml() {
        let cfg = Config::default();
        let rendered = to_toml(&cfg).unwrap();
        assert!(rendered.contains("refresh_ms = 1000"));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, cfg);
    }
}
