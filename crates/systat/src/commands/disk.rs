//! `systat disk`: partitions, usage and I/O counters.

use tabled::Tabled;

use systat_core::report::{DiskReport, disk_report};

use crate::error::CliError;
use crate::output::{render, titled_table};

use super::Context;
use super::util::{fmt_bytes, fmt_percent};

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Mount")]
    mount: String,
    #[tabled(rename = "FS")]
    fs_type: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Used %")]
    percent: String,
}

#[derive(Tabled)]
struct PartitionRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Mount")]
    mount: String,
    #[tabled(rename = "FS")]
    fs_type: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Removable")]
    removable: bool,
    #[tabled(rename = "Read-only")]
    read_only: bool,
}

#[derive(Tabled)]
struct IoRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Reads")]
    reads: u64,
    #[tabled(rename = "Writes")]
    writes: u64,
    #[tabled(rename = "Read")]
    read_bytes: String,
    #[tabled(rename = "Written")]
    write_bytes: String,
}

fn table(report: &DiskReport) -> String {
    let usage: Vec<UsageRow> = report
        .usage
        .iter()
        .map(|u| UsageRow {
            device: u.device.clone(),
            mount: u.mount_point.clone(),
            fs_type: u.fs_type.clone(),
            used: fmt_bytes(u.usage.used),
            total: fmt_bytes(u.usage.total),
            percent: fmt_percent(u.usage.used_percent),
        })
        .collect();

    let partitions: Vec<PartitionRow> = report
        .partitions
        .iter()
        .map(|p| PartitionRow {
            device: p.device.clone(),
            mount: p.mount_point.display().to_string(),
            fs_type: p.fs_type.clone(),
            kind: p.kind.clone(),
            removable: p.removable,
            read_only: p.read_only,
        })
        .collect();

    let io: Vec<IoRow> = report
        .io_counters
        .iter()
        .map(|(device, c)| IoRow {
            device: device.clone(),
            reads: c.read_count,
            writes: c.write_count,
            read_bytes: fmt_bytes(c.read_bytes),
            write_bytes: fmt_bytes(c.write_bytes),
        })
        .collect();

    [
        titled_table("Usage", &usage),
        titled_table("Partitions", &partitions),
        titled_table("I/O counters", &io),
    ]
    .join("\n\n")
}

pub async fn handle(ctx: &Context) -> Result<String, CliError> {
    let report = disk_report().await?;
    render(&ctx.output, &report, table)
}
