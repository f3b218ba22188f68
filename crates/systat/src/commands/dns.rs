//! `systat dns`: one query against one resolver.

use tabled::Tabled;

use systat_config::parse_dns_server;
use systat_core::report::{DnsAnswer, dns_query, parse_record_type, validate_domain};

use crate::cli::DnsArgs;
use crate::error::CliError;
use crate::output::{render, render_table};

use super::Context;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "TTL")]
    ttl: u32,
    #[tabled(rename = "Data")]
    data: String,
}

fn table(answer: &DnsAnswer) -> String {
    let rows: Vec<RecordRow> = answer
        .records
        .iter()
        .map(|r| RecordRow {
            name: r.name.clone(),
            record_type: r.record_type.clone(),
            ttl: r.ttl,
            data: r.data.clone(),
        })
        .collect();
    format!(
        "{} {} @{}: {}\n{}",
        answer.domain,
        answer.record_type,
        answer.server,
        answer.response_code,
        render_table(&rows)
    )
}

pub async fn handle(args: &DnsArgs, ctx: &Context) -> Result<String, CliError> {
    // Argument problems are reported before anything touches the network.
    validate_domain(&args.domain)?;
    let record_type = parse_record_type(&args.record_type)?;

    let server = match &args.server {
        Some(value) => parse_dns_server(value).map_err(|e| CliError::Validation {
            field: "--server".into(),
            reason: e.to_string(),
        })?,
        None => ctx.config.dns_server()?,
    };

    let answer = dns_query(&args.domain, record_type, server).await?;
    render(&ctx.output, &answer, table)
}
