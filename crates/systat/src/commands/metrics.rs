//! `systat metrics`: host, CPU, load and memory metrics.

use tabled::Tabled;

use systat_core::report::{MetricsReport, metrics_report};

use crate::error::CliError;
use crate::output::{kv_table, render, render_table};

use super::Context;
use super::util::{fmt_bytes, fmt_percent};

#[derive(Tabled)]
struct CoreRow {
    #[tabled(rename = "Core")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "MHz")]
    frequency: u64,
    #[tabled(rename = "Usage")]
    usage: String,
}

fn table(report: &MetricsReport) -> String {
    let summary = serde_json::json!({
        "hostname": report.host.hostname,
        "uptime_secs": report.host.uptime_secs,
        "processes": report.host.processes,
        "cpu.physical_cores": report.cpu.physical_cores,
        "cpu.logical_cores": report.cpu.logical_cores,
        "cpu.usage": fmt_percent(report.cpu.global_usage_percent),
        "load": report.load.map(|l| format!("{:.2} {:.2} {:.2}", l.one, l.five, l.fifteen)),
        "memory.used": fmt_bytes(report.memory.used),
        "memory.total": fmt_bytes(report.memory.total),
        "memory.used_percent": fmt_percent(report.memory.used_percent),
        "swap.used": fmt_bytes(report.swap.used),
        "swap.total": fmt_bytes(report.swap.total),
    });

    let cores: Vec<CoreRow> = report
        .cpu
        .cores
        .iter()
        .map(|c| CoreRow {
            name: c.name.clone(),
            brand: c.brand.clone(),
            frequency: c.frequency_mhz,
            usage: fmt_percent(c.usage_percent),
        })
        .collect();

    format!("{}\n{}", kv_table(&summary), render_table(&cores))
}

pub async fn handle(ctx: &Context) -> Result<String, CliError> {
    let report = metrics_report().await?;
    render(&ctx.output, &report, table)
}
