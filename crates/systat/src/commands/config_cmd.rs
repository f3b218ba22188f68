//! `systat config`: inspect the effective configuration.

use systat_config::to_toml;

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::error::CliError;

use super::Context;

pub fn handle(args: &ConfigArgs, ctx: &Context) -> Result<String, CliError> {
    match args.command {
        ConfigCommand::Show => Ok(to_toml(&ctx.config)?),
        ConfigCommand::Path => Ok(ctx.config_path.display().to_string()),
    }
}
