mod cli;
mod commands;
mod error;
mod highlight;
mod output;

use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use systat_config::{Config, config_path, load_config, load_config_from};
use systat_core::MonitorConfig;
use systat_tui::DashboardOptions;

use crate::cli::{Cli, Command, DashboardArgs, GlobalOpts};
use crate::commands::Context;
use crate::error::CliError;
use crate::output::OutputConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The dashboard owns the terminal and logs to a file instead.
    if !matches!(cli.command, Command::Dashboard(_)) {
        init_tracing(cli.global.level.as_str());
    }

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "systat", &mut std::io::stdout());
            Ok(())
        }

        Command::Dashboard(args) => run_dashboard(&global, args).await,

        cmd => {
            let config = load(&global)?;
            let ctx = Context {
                output: OutputConfig::resolve(&global, &config)?,
                config,
                config_path: global.config.clone().unwrap_or_else(config_path),
                watch: global.watch,
                interval: global.interval,
            };

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &ctx).await
        }
    }
}

fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(match &global.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

async fn run_dashboard(global: &GlobalOpts, args: DashboardArgs) -> Result<(), CliError> {
    // A broken config file should not keep the dashboard from starting.
    // Warnings are printed before the TUI takes over the screen.
    let config = load(global).unwrap_or_else(|e| {
        eprintln!("warning: {e}; using default configuration");
        Config::default()
    });
    let mut monitor = config.monitor_config().unwrap_or_else(|e| {
        eprintln!("warning: {e}; using default dashboard settings");
        MonitorConfig::default()
    });

    if let Some(ms) = args.refresh {
        monitor.refresh_interval = Duration::from_millis(ms);
    }
    if args.kubeconfig.is_some() {
        monitor.kubeconfig = args.kubeconfig;
    }

    systat_tui::run(DashboardOptions {
        monitor,
        log_level: global.level.as_str().to_owned(),
        log_file: args.log_file,
    })
    .await
    .map_err(|e| {
        warn!(error = ?e, "dashboard exited with an error");
        CliError::Dashboard {
            reason: format!("{e:?}"),
        }
    })
}
