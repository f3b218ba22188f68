//! Clap derive structures for the `systat` CLI.
//!
//! Defines the command tree and global flags. Kept free of crate-internal
//! imports so `build.rs` can include it to render man pages.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// systat -- system information and monitoring
#[derive(Debug, Parser)]
#[command(
    name = "systat",
    version,
    about = "Query system, network, DNS and cluster state from the command line",
    long_about = "Query host, CPU, memory, disk, process, network, DNS and Kubernetes state.\n\n\
        One-shot commands print YAML (default), JSON or a table. `systat dashboard`\n\
        opens a live terminal view with health checks.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// Shorthand for `--output json`
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Print YAML/JSON without syntax highlighting
    #[arg(long, global = true)]
    pub raw: bool,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Re-run the command every `--interval` until interrupted
    #[arg(long, short = 'w', global = true)]
    pub watch: bool,

    /// Delay between runs in watch mode (e.g. 500ms, 2s, 1m)
    #[arg(long, default_value = "2s", value_parser = humantime::parse_duration, global = true)]
    pub interval: Duration,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    pub level: LogLevel,

    /// Configuration file to use instead of the default location
    #[arg(long, env = "SYSTAT_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

// ── Enums ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML document (default)
    Yaml,
    /// Pretty-printed JSON
    Json,
    /// Rounded table
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Host, OS, hardware and CPU identification
    Sysinfo,

    /// Live CPU, load and memory metrics
    Metrics,

    /// Partitions, usage and I/O counters
    Disk,

    /// Every running process
    #[command(alias = "ps")]
    Process,

    /// Links and routes (Linux only)
    #[command(alias = "net")]
    Network,

    /// Query a DNS server for one domain
    Dns(DnsArgs),

    /// Nodes, namespaces and pods of the current cluster
    K8s(K8sArgs),

    /// Interactive dashboard
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct DnsArgs {
    /// Domain to resolve
    pub domain: String,

    /// Resolver as ip or ip:port (defaults to the config file's `dns.server`)
    #[arg(long, short = 's')]
    pub server: Option<String>,

    /// Record type: A, AAAA, CNAME, MX, NS, PTR, SOA, SRV, TXT
    #[arg(long = "type", short = 't', default_value = "A")]
    pub record_type: String,
}

#[derive(Debug, Args)]
pub struct K8sArgs {
    /// Kubeconfig to use instead of the standard search order
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Refresh period in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh: Option<u64>,

    /// Write logs here instead of the daily log under the data directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Kubeconfig for the namespace panel
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
