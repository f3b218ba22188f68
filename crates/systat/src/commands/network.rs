//! `systat network`: links and routes.

use tabled::Tabled;

use systat_core::report::{Link, NetworkReport, network_report};

use crate::error::CliError;
use crate::output::{render, titled_table};

use super::Context;
use super::util::{fmt_bytes, or_dash};

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "MTU")]
    mtu: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Addresses")]
    addresses: String,
    #[tabled(rename = "RX")]
    rx: String,
    #[tabled(rename = "TX")]
    tx: String,
    #[tabled(rename = "Drops")]
    drops: u64,
}

impl From<&Link> for LinkRow {
    fn from(link: &Link) -> Self {
        let stats = &link.statistics;
        Self {
            index: or_dash(link.index),
            name: link.name.clone(),
            state: link.state.clone().unwrap_or_else(|| "-".into()),
            mtu: or_dash(link.mtu),
            mac: link.hardware_addr.clone().unwrap_or_else(|| "-".into()),
            addresses: link.addresses.join("\n"),
            rx: fmt_bytes(stats.rx_bytes),
            tx: fmt_bytes(stats.tx_bytes),
            drops: stats.rx_dropped + stats.tx_dropped,
        }
    }
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Family")]
    family: &'static str,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Iface")]
    interface: String,
    #[tabled(rename = "Metric")]
    metric: u32,
    #[tabled(rename = "Flags")]
    flags: String,
}

fn table(report: &NetworkReport) -> String {
    let links: Vec<LinkRow> = report.links.iter().map(LinkRow::from).collect();
    let routes: Vec<RouteRow> = report
        .routes
        .iter()
        .map(|r| RouteRow {
            family: r.family,
            destination: r.destination.clone(),
            gateway: or_dash(r.gateway),
            source: or_dash(r.source),
            interface: r.interface.clone(),
            metric: r.metric,
            flags: r.flags.join(","),
        })
        .collect();

    format!(
        "{}\n\n{}",
        titled_table("Links", &links),
        titled_table("Routes (table main)", &routes)
    )
}

pub async fn handle(ctx: &Context) -> Result<String, CliError> {
    let report = network_report().await?;
    render(&ctx.output, &report, table)
}
