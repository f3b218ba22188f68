//! Data bridge: connects the [`Aggregator`] to dashboard actions.
//!
//! Runs as a background task. Every snapshot and probe result the
//! aggregator publishes is forwarded as an [`Action`] through the
//! dashboard's action channel, until the session is cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use systat_core::{Aggregator, MonitorConfig, Sources, SystemProber, Update};

use crate::action::Action;

/// Build the live adapters from `config` and bridge them to the TUI.
pub async fn spawn_data_bridge(
    config: MonitorConfig,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let sources = tokio::select! {
        () = cancel.cancelled() => return,
        sources = Sources::system(config.kubeconfig.as_deref()) => match sources {
            Ok(sources) => sources,
            Err(e) => {
                warn!(error = %e, "stat sources failed to start");
                return;
            }
        },
    };
    let prober = Arc::new(SystemProber::new(config.probe_timeout));
    let aggregator = Aggregator::new(sources, prober, &config);
    bridge(aggregator, action_tx, cancel).await;
}

/// Forward aggregator updates until cancelled or either side hangs up.
pub async fn bridge(
    aggregator: Aggregator,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let handle = aggregator.spawn(update_tx, cancel.child_token());
    info!("data bridge started");

    loop {
        let update = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            update = update_rx.recv() => match update {
                Some(update) => update,
                None => break,
            },
        };

        let action = match update {
            Update::Snapshot(snapshot) => Action::SnapshotUpdated(snapshot),
            Update::Probe(outcome) => Action::ProbeResolved(outcome),
        };
        if action_tx.send(action).is_err() {
            debug!("action channel closed");
            break;
        }
    }

    cancel.cancel();
    if let Err(e) = handle.await {
        debug!(error = %e, "aggregator task ended abnormally");
    }
    info!("data bridge stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use futures::future::BoxFuture;
    use systat_core::model::{CpuStats, DiskStats, MemoryUsage};
    use systat_core::{CoreError, Domain, ProbeTarget, Prober, StatSource, UsageStat};

    use super::*;

    struct Fixed<T>(Domain, T);

    impl<T: Clone + Send + Sync> StatSource for Fixed<T> {
        type Output = T;

        fn domain(&self) -> Domain {
            self.0
        }

        fn fetch(&self) -> BoxFuture<'_, Result<T, CoreError>> {
            Box::pin(async move { Ok(self.1.clone()) })
        }
    }

    struct AlwaysUp;

    impl Prober for AlwaysUp {
        fn probe<'a>(&'a self, _target: &'a ProbeTarget) -> BoxFuture<'a, bool> {
            Box::pin(async { true })
        }
    }

    fn aggregator() -> Aggregator {
        let sources = Sources {
            cpu: Box::new(Fixed(
                Domain::Cpu,
                CpuStats {
                    per_core: vec![5.0],
                    load: None,
                },
            )),
            memory: Box::new(Fixed(
                Domain::Memory,
                MemoryUsage {
                    ram: UsageStat::new(1, 4),
                    swap: UsageStat::new(0, 0),
                },
            )),
            disk: Box::new(Fixed(Domain::Disk, DiskStats::default())),
            network: Box::new(Fixed(Domain::Network, BTreeMap::new())),
            cluster: None,
        };
        let config = MonitorConfig {
            refresh_interval: Duration::from_millis(20),
            probes: vec![ProbeTarget::dns("runtime.uds.dev")],
            ..MonitorConfig::default()
        };
        Aggregator::new(sources, Arc::new(AlwaysUp), &config)
    }

    #[tokio::test]
    async fn forwards_snapshots_and_probes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(bridge(aggregator(), tx, cancel.clone()));

        let mut saw_snapshot = false;
        let mut saw_probe = false;
        while !(saw_snapshot && saw_probe) {
            match rx.recv().await.unwrap() {
                Action::SnapshotUpdated(s) => {
                    assert_eq!(s.cpu, Some(vec![5.0]));
                    saw_snapshot = true;
                }
                Action::ProbeResolved(p) => {
                    assert_eq!(p.name, "runtime.uds.dev");
                    assert!(p.healthy);
                    saw_probe = true;
                }
                other => panic!("unexpected action {other:?}"),
            }
        }

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn stops_when_the_dashboard_goes_away() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let cancel = CancellationToken::new();
        tokio::time::timeout(Duration::from_secs(2), bridge(aggregator(), tx, cancel.clone()))
            .await
            .unwrap();
        assert!(cancel.is_cancelled());
    }
}
