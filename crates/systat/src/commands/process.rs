//! `systat process`: every running process.

use tabled::Tabled;

use systat_core::report::{ProcessInfo, process_report};

use crate::error::CliError;
use crate::output::{render, render_table};

use super::Context;
use super::util::{fmt_bytes, fmt_percent, fmt_time, or_dash};

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "PID")]
    pid: u32,
    #[tabled(rename = "PPID")]
    parent: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "RSS")]
    rss: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Started")]
    started: String,
}

impl From<&ProcessInfo> for ProcessRow {
    fn from(p: &ProcessInfo) -> Self {
        Self {
            pid: p.pid,
            parent: or_dash(p.parent),
            name: p.name.clone(),
            status: p.status.clone(),
            cpu: fmt_percent(p.cpu_percent),
            rss: fmt_bytes(p.memory_rss),
            user: p.username.clone().unwrap_or_else(|| "-".into()),
            started: fmt_time(p.create_time),
        }
    }
}

fn table(processes: &[ProcessInfo]) -> String {
    let rows: Vec<ProcessRow> = processes.iter().map(ProcessRow::from).collect();
    render_table(&rows)
}

pub async fn handle(ctx: &Context) -> Result<String, CliError> {
    let processes = process_report().await?;
    render(&ctx.output, processes.as_slice(), table)
}
