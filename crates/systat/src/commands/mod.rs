//! Command dispatch: bridges CLI args -> core reports -> output formatting.

pub mod config_cmd;
pub mod disk;
pub mod dns;
pub mod k8s;
pub mod metrics;
pub mod network;
pub mod process;
pub mod sysinfo;
pub mod util;

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use systat_config::Config;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::{OutputConfig, print_output};

/// Everything a one-shot command handler needs.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputConfig,
    pub config: Config,
    /// Where `config` was loaded from (or would be).
    pub config_path: PathBuf,
    pub watch: bool,
    pub interval: Duration,
}

/// Run a report command once, or repeatedly under `--watch` until Ctrl-C.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    if !ctx.watch {
        print_output(&collect(&cmd, ctx).await?);
        return Ok(());
    }

    let mut interval = tokio::time::interval(ctx.interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => {
                debug!("watch interrupted");
                return Ok(());
            }
            output = async {
                interval.tick().await;
                collect(&cmd, ctx).await
            } => print_output(&output?),
        }
    }
}

async fn collect(cmd: &Command, ctx: &Context) -> Result<String, CliError> {
    match cmd {
        Command::Sysinfo => sysinfo::handle(ctx).await,
        Command::Metrics => metrics::handle(ctx).await,
        Command::Disk => disk::handle(ctx).await,
        Command::Process => process::handle(ctx).await,
        Command::Network => network::handle(ctx).await,
        Command::Dns(args) => dns::handle(args, ctx).await,
        Command::K8s(args) => k8s::handle(args, ctx).await,
        Command::Config(args) => config_cmd::handle(args, ctx),
        // Dashboard and Completions are handled before dispatch
        Command::Dashboard(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "not a report command".into(),
        }),
    }
}
