use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use sysinfo::{NetworkData, Networks};

use super::{Domain, StatSource};
use crate::error::CoreError;
use crate::model::InterfaceStats;
use crate::procfs::read_sysfs_u64;

/// Cumulative per-interface counters joined with bound IPv4 addresses.
pub struct NetworkSource {
    networks: Arc<Mutex<Networks>>,
}

impl NetworkSource {
    pub fn new() -> Self {
        Self {
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
        }
    }
}

impl Default for NetworkSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive and transmit drop counters from sysfs, zero where the
/// platform does not expose them.
pub fn interface_drops(name: &str) -> (u64, u64) {
    let base = format!("/sys/class/net/{name}/statistics");
    (
        read_sysfs_u64(format!("{base}/rx_dropped")).unwrap_or(0),
        read_sysfs_u64(format!("{base}/tx_dropped")).unwrap_or(0),
    )
}

pub(crate) fn interface_stats(name: &str, data: &NetworkData) -> InterfaceStats {
    let ipv4 = data
        .ip_networks()
        .iter()
        .filter_map(|n| match n.addr {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .collect();
    let (rx_dropped, tx_dropped) = interface_drops(name);

    InterfaceStats {
        name: name.to_string(),
        mac: data.mac_address().to_string(),
        ipv4,
        rx_bytes: data.total_received(),
        tx_bytes: data.total_transmitted(),
        rx_packets: data.total_packets_received(),
        tx_packets: data.total_packets_transmitted(),
        rx_errors: data.total_errors_on_received(),
        tx_errors: data.total_errors_on_transmitted(),
        rx_dropped,
        tx_dropped,
    }
}

impl StatSource for NetworkSource {
    type Output = BTreeMap<String, InterfaceStats>;

    fn domain(&self) -> Domain {
        Domain::Network
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Output, CoreError>> {
        let networks = Arc::clone(&self.networks);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let mut networks = networks
                    .lock()
                    .map_err(|_| CoreError::unavailable("network", "sampler lock poisoned"))?;
                networks.refresh(true);
                Ok(networks
                    .list()
                    .iter()
                    .map(|(name, data)| (name.clone(), interface_stats(name, data)))
                    .collect())
            })
            .await?
        })
    }
}
