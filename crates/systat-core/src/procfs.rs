//! Parsers for `/proc` and `/sys` files.
//!
//! Pure functions over file contents, so they are testable with string
//! inputs on any platform. The readers that feed them live next to the
//! sources that need them.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::DiskIo;

const SECTOR_SIZE: u64 = 512;

// ============ Disk Stats ============

/// Parses `/proc/diskstats` into cumulative counters keyed by device.
///
/// Format: major minor name reads r_merged r_sectors r_time writes
/// w_merged w_sectors w_time io_pending io_time w_io_time [...]
pub fn parse_diskstats(content: &str) -> BTreeMap<String, DiskIo> {
    let mut disks = BTreeMap::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 14 {
            continue;
        }
        let get = |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };

        disks.insert(
            parts[2].to_string(),
            DiskIo {
                read_count: get(3),
                read_bytes: get(5).saturating_mul(SECTOR_SIZE),
                read_time_ms: get(6),
                write_count: get(7),
                write_bytes: get(9).saturating_mul(SECTOR_SIZE),
                write_time_ms: get(10),
                io_time_ms: get(12),
            },
        );
    }

    disks
}

// ============ Routes ============

const RTF_UP: u32 = 0x0001;
const RTF_GATEWAY: u32 = 0x0002;
const RTF_HOST: u32 = 0x0004;
const RTF_DYNAMIC: u32 = 0x0010;
const RTF_MODIFIED: u32 = 0x0020;
const RTF_REJECT: u32 = 0x0200;

/// procfs only exposes the main routing table.
const MAIN_TABLE: &str = "main";

/// One kernel routing table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub family: &'static str,
    /// Destination in CIDR notation; `default` for the zero route.
    pub destination: String,
    pub gateway: Option<IpAddr>,
    /// Preferred source; only IPv6 routes carry one in procfs.
    pub source: Option<IpAddr>,
    pub interface: String,
    pub metric: u32,
    pub flags: Vec<&'static str>,
    pub table: &'static str,
}

fn route_flags(bits: u32) -> Vec<&'static str> {
    [
        (RTF_UP, "up"),
        (RTF_GATEWAY, "gateway"),
        (RTF_HOST, "host"),
        (RTF_DYNAMIC, "dynamic"),
        (RTF_MODIFIED, "modified"),
        (RTF_REJECT, "reject"),
    ]
    .into_iter()
    .filter(|(bit, _)| bits & bit != 0)
    .map(|(_, name)| name)
    .collect()
}

fn hex_u32(file: &str, field: &str) -> Result<u32, CoreError> {
    u32::from_str_radix(field, 16).map_err(|e| CoreError::Parse {
        file: file.into(),
        reason: format!("bad hex field '{field}': {e}"),
    })
}

/// `/proc/net/route` prints addresses as the host-order view of a
/// network-order word.
fn proc_ipv4(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value.to_le_bytes())
}

/// Parses `/proc/net/route` (IPv4, main table).
pub fn parse_ipv4_routes(content: &str) -> Result<Vec<Route>, CoreError> {
    const FILE: &str = "/proc/net/route";
    let mut routes = Vec::new();

    for line in content.lines().skip(1) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 8 {
            continue;
        }

        let dest = proc_ipv4(hex_u32(FILE, parts[1])?);
        let gateway = proc_ipv4(hex_u32(FILE, parts[2])?);
        let flags = hex_u32(FILE, parts[3])?;
        let metric = parts[6].parse().unwrap_or(0);
        let prefix = hex_u32(FILE, parts[7])?.count_ones();

        let destination = if dest.is_unspecified() && prefix == 0 {
            "default".to_string()
        } else {
            format!("{dest}/{prefix}")
        };

        routes.push(Route {
            family: "inet",
            destination,
            gateway: (!gateway.is_unspecified()).then_some(IpAddr::V4(gateway)),
            source: None,
            interface: parts[0].to_string(),
            metric,
            flags: route_flags(flags),
            table: MAIN_TABLE,
        });
    }

    Ok(routes)
}

fn hex_ipv6(field: &str) -> Result<Ipv6Addr, CoreError> {
    u128::from_str_radix(field, 16)
        .map(Ipv6Addr::from)
        .map_err(|e| CoreError::Parse {
            file: "/proc/net/ipv6_route".into(),
            reason: format!("bad address '{field}': {e}"),
        })
}

/// Parses `/proc/net/ipv6_route`.
///
/// Format: dest dest_prefix src src_prefix next_hop metric refcnt use
/// flags iface, addresses as 32 hex digits in network order.
pub fn parse_ipv6_routes(content: &str) -> Result<Vec<Route>, CoreError> {
    const FILE: &str = "/proc/net/ipv6_route";
    let mut routes = Vec::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 {
            continue;
        }

        let dest = hex_ipv6(parts[0])?;
        let prefix = hex_u32(FILE, parts[1])?;
        let source = hex_ipv6(parts[2])?;
        let next_hop = hex_ipv6(parts[4])?;
        let metric = hex_u32(FILE, parts[5])?;
        let flags = hex_u32(FILE, parts[8])?;

        let destination = if dest.is_unspecified() && prefix == 0 {
            "default".to_string()
        } else {
            format!("{dest}/{prefix}")
        };

        routes.push(Route {
            family: "inet6",
            destination,
            gateway: (!next_hop.is_unspecified()).then_some(IpAddr::V6(next_hop)),
            source: (!source.is_unspecified()).then_some(IpAddr::V6(source)),
            interface: parts[9].to_string(),
            metric,
            flags: route_flags(flags),
            table: MAIN_TABLE,
        });
    }

    Ok(routes)
}

// ============ Links ============

/// Decodes the `flags` attribute of `/sys/class/net/<iface>`.
pub fn parse_link_flags(content: &str) -> Vec<&'static str> {
    let raw = content.trim().trim_start_matches("0x");
    let Ok(bits) = u32::from_str_radix(raw, 16) else {
        return Vec::new();
    };

    [
        (0x1, "up"),
        (0x2, "broadcast"),
        (0x8, "loopback"),
        (0x10, "pointtopoint"),
        (0x40, "running"),
        (0x80, "noarp"),
        (0x100, "promisc"),
        (0x1000, "multicast"),
    ]
    .into_iter()
    .filter(|(bit, _)| bits & bit != 0)
    .map(|(_, name)| name)
    .collect()
}

/// Maps an `ARPHRD_*` link type number to a short name.
pub fn link_type_name(arphrd: u16) -> &'static str {
    match arphrd {
        1 => "ether",
        32 => "infiniband",
        512 => "ppp",
        768 => "ipip",
        769 => "tunnel6",
        772 => "loopback",
        776 => "sit",
        778 => "gre",
        823 => "ip6gre",
        65534 => "none",
        _ => "other",
    }
}

/// Reads a single-value sysfs attribute, trimmed. `None` when missing
/// or unreadable.
pub fn read_sysfs(path: impl AsRef<Path>) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn read_sysfs_u64(path: impl AsRef<Path>) -> Option<u64> {
    read_sysfs(path).and_then(|s| s.parse().ok())
}
