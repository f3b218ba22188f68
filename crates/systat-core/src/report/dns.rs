use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use serde::Serialize;
use tracing::debug;

use crate::error::CoreError;

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Record types the `dns` command accepts.
pub const SUPPORTED_RECORD_TYPES: [RecordType; 9] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::MX,
    RecordType::NS,
    RecordType::PTR,
    RecordType::SOA,
    RecordType::SRV,
    RecordType::TXT,
];

#[derive(Debug, Clone, Serialize)]
pub struct DnsAnswer {
    pub domain: String,
    pub record_type: String,
    pub server: String,
    pub response_code: String,
    pub records: Vec<DnsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub data: String,
}

/// Reject anything that is not a syntactically valid hostname.
///
/// One trailing dot is allowed. Labels are 1-63 characters of letters,
/// digits, `-` and `_`, and never start or end with `-`.
pub fn validate_domain(domain: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidDomain {
        domain: domain.to_string(),
        reason: reason.to_string(),
    };

    let name = domain.strip_suffix('.').unwrap_or(domain);
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    if name.len() > 253 {
        return Err(invalid("longer than 253 characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("empty label"));
        }
        if label.len() > 63 {
            return Err(invalid("label longer than 63 characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("label starts or ends with '-'"));
        }
        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(invalid(&format!("unexpected character '{c}'")));
        }
    }
    Ok(())
}

pub fn parse_record_type(value: &str) -> Result<RecordType, CoreError> {
    RecordType::from_str(&value.to_ascii_uppercase())
        .ok()
        .filter(|rt| SUPPORTED_RECORD_TYPES.contains(rt))
        .ok_or_else(|| CoreError::InvalidRecordType(value.to_string()))
}

fn resolver_for(server: SocketAddr) -> TokioAsyncResolver {
    let mut config = ResolverConfig::new();
    config.add_name_server(NameServerConfig::new(server, Protocol::Udp));

    let mut opts = ResolverOpts::default();
    opts.timeout = QUERY_TIMEOUT;
    opts.attempts = 1;
    opts.cache_size = 0;
    opts.use_hosts_file = false;

    TokioAsyncResolver::tokio(config, opts)
}

/// Ask `server` for `record_type` records of `domain`.
///
/// A name with no records of that type is an empty answer, not an
/// error; the response code says why.
pub async fn dns_query(
    domain: &str,
    record_type: RecordType,
    server: SocketAddr,
) -> Result<DnsAnswer, CoreError> {
    validate_domain(domain)?;

    let fqdn = if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    };
    debug!(%fqdn, %record_type, %server, "sending DNS query");

    let answer = |response_code: ResponseCode, records: Vec<DnsRecord>| DnsAnswer {
        domain: fqdn.clone(),
        record_type: record_type.to_string(),
        server: server.to_string(),
        response_code: response_code.to_string(),
        records,
    };

    match resolver_for(server).lookup(fqdn.as_str(), record_type).await {
        Ok(lookup) => {
            let records = lookup
                .records()
                .iter()
                .map(|r| DnsRecord {
                    name: r.name().to_string(),
                    record_type: r.record_type().to_string(),
                    ttl: r.ttl(),
                    data: r.data().map(ToString::to_string).unwrap_or_default(),
                })
                .collect();
            Ok(answer(ResponseCode::NoError, records))
        }
        Err(e) => match e.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                Ok(answer(*response_code, Vec::new()))
            }
            _ => Err(CoreError::Dns {
                domain: fqdn.clone(),
                server: server.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}
