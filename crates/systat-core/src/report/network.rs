use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use sysinfo::Networks;
use tracing::debug;

use crate::error::CoreError;
use crate::procfs::{
    Route, link_type_name, parse_ipv4_routes, parse_ipv6_routes, parse_link_flags, read_sysfs,
    read_sysfs_u64,
};

const SYSFS_NET: &str = "/sys/class/net";

#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub links: Vec<Link>,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub index: Option<u64>,
    pub name: String,
    pub kind: String,
    pub hardware_addr: Option<String>,
    pub mtu: Option<u64>,
    pub flags: Vec<&'static str>,
    pub state: Option<String>,
    pub addresses: Vec<String>,
    pub statistics: LinkStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkStatistics {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub multicast: u64,
    pub collisions: u64,
}

fn link_kind(dir: &Path) -> String {
    let devtype = read_sysfs(dir.join("uevent")).and_then(|uevent| {
        uevent
            .lines()
            .find_map(|l| l.strip_prefix("DEVTYPE=").map(ToString::to_string))
    });
    if let Some(devtype) = devtype {
        return devtype;
    }
    if dir.join("device").exists() {
        return "device".into();
    }
    read_sysfs(dir.join("type"))
        .and_then(|t| t.parse().ok())
        .map_or("other", link_type_name)
        .to_string()
}

/// Read one interface's attributes from its sysfs directory.
pub(crate) fn read_link(dir: &Path, addresses: Vec<String>) -> Link {
    let stat = |name: &str| read_sysfs_u64(dir.join("statistics").join(name)).unwrap_or(0);

    Link {
        index: read_sysfs_u64(dir.join("ifindex")),
        name: dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        kind: link_kind(dir),
        hardware_addr: read_sysfs(dir.join("address")),
        mtu: read_sysfs_u64(dir.join("mtu")),
        flags: read_sysfs(dir.join("flags"))
            .map(|f| parse_link_flags(&f))
            .unwrap_or_default(),
        state: read_sysfs(dir.join("operstate")),
        addresses,
        statistics: LinkStatistics {
            rx_bytes: stat("rx_bytes"),
            tx_bytes: stat("tx_bytes"),
            rx_packets: stat("rx_packets"),
            tx_packets: stat("tx_packets"),
            rx_errors: stat("rx_errors"),
            tx_errors: stat("tx_errors"),
            rx_dropped: stat("rx_dropped"),
            tx_dropped: stat("tx_dropped"),
            multicast: stat("multicast"),
            collisions: stat("collisions"),
        },
    }
}

/// Interface addresses in CIDR form, keyed by interface name.
fn interface_addresses() -> BTreeMap<String, Vec<String>> {
    let networks = Networks::new_with_refreshed_list();
    networks
        .list()
        .iter()
        .map(|(name, data)| {
            let addrs = data
                .ip_networks()
                .iter()
                .map(|n| format!("{}/{}", n.addr, n.prefix))
                .collect();
            (name.clone(), addrs)
        })
        .collect()
}

fn read_links(root: &Path, mut addresses: BTreeMap<String, Vec<String>>) -> Result<Vec<Link>, CoreError> {
    let mut links = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let dir = entry?.path();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        links.push(read_link(&dir, addresses.remove(&name).unwrap_or_default()));
    }
    links.sort_by_key(|l| (l.index.unwrap_or(u64::MAX), l.name.clone()));
    Ok(links)
}

fn read_routes() -> Result<Vec<Route>, CoreError> {
    let mut routes = parse_ipv4_routes(&std::fs::read_to_string("/proc/net/route")?)?;
    match std::fs::read_to_string("/proc/net/ipv6_route") {
        Ok(content) => routes.extend(parse_ipv6_routes(&content)?),
        Err(e) => debug!(error = %e, "no IPv6 routing table"),
    }
    Ok(routes)
}

fn collect() -> Result<NetworkReport, CoreError> {
    if !cfg!(target_os = "linux") {
        return Err(CoreError::Unsupported {
            feature: "network link and route listing".into(),
        });
    }
    Ok(NetworkReport {
        links: read_links(Path::new(SYSFS_NET), interface_addresses())?,
        routes: read_routes()?,
    })
}

/// Links with their attributes and statistics, plus the kernel's IPv4
/// and IPv6 routes. Linux only.
pub async fn network_report() -> Result<NetworkReport, CoreError> {
    tokio::task::spawn_blocking(collect).await?
}
