//! `systat sysinfo`: host identification.

use systat_core::report::system_report;

use crate::error::CliError;
use crate::output::{kv_table, render};

use super::Context;

pub async fn handle(ctx: &Context) -> Result<String, CliError> {
    let report = system_report().await?;
    render(&ctx.output, &report, kv_table)
}
