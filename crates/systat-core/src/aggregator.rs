// ── Refresh loop ──
//
// Every tick fans out to all stat sources, joins them into one
// `Snapshot`, and publishes it as a single message. Probes start on the
// same tick but are not joined: each one reports back on its own as an
// `Update::Probe`. Nothing here is shared between tasks; results travel
// over the channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{MonitorConfig, ProbeTarget};
use crate::model::{ProbeOutcome, Snapshot};
use crate::probe::Prober;
use crate::source::{Sources, StatSource};

/// Messages from the refresh loop to its consumer.
#[derive(Debug, Clone)]
pub enum Update {
    /// A complete snapshot for one tick.
    Snapshot(Arc<Snapshot>),
    /// A single health probe resolved.
    Probe(ProbeOutcome),
}

pub struct Aggregator {
    sources: Sources,
    prober: Arc<dyn Prober>,
    probes: Vec<ProbeTarget>,
    period: Duration,
}

/// Run one fetch, folding failure or a fetch that outlives `limit` into
/// "no data" for this tick.
async fn fetch_or_absent<T: Send>(source: &dyn StatSource<Output = T>, limit: Duration) -> Option<T> {
    match tokio::time::timeout(limit, source.fetch()).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            debug!(domain = %source.domain(), error = %e, "source fetch failed");
            None
        }
        Err(_) => {
            debug!(domain = %source.domain(), limit_ms = limit.as_millis(), "source fetch timed out");
            None
        }
    }
}

impl Aggregator {
    pub fn new(sources: Sources, prober: Arc<dyn Prober>, config: &MonitorConfig) -> Self {
        Self {
            sources,
            prober,
            probes: config.probes.clone(),
            period: config.refresh_interval,
        }
    }

    /// Fetch every domain concurrently and assemble the tick's snapshot.
    ///
    /// No fetch may take longer than one refresh period; a source that
    /// does is absent from this snapshot and asked again next tick.
    pub async fn collect(&mut self, tick: u64) -> Snapshot {
        let limit = self.period;
        let cluster = async {
            match self.sources.cluster.as_deref() {
                Some(source) => Some(tokio::time::timeout(limit, source.fetch()).await),
                None => None,
            }
        };

        let (cpu, memory, disk, network, cluster) = tokio::join!(
            fetch_or_absent(self.sources.cpu.as_ref(), limit),
            fetch_or_absent(self.sources.memory.as_ref(), limit),
            fetch_or_absent(self.sources.disk.as_ref(), limit),
            fetch_or_absent(self.sources.network.as_ref(), limit),
            cluster,
        );

        let namespaces = match cluster {
            Some(Ok(Ok(namespaces))) => Some(namespaces),
            Some(Ok(Err(e))) if e.disables_source() => {
                info!(error = %e, "cluster source disabled");
                self.sources.cluster = None;
                None
            }
            Some(Ok(Err(e))) => {
                debug!(domain = "cluster", error = %e, "source fetch failed");
                None
            }
            Some(Err(_)) => {
                debug!(domain = "cluster", limit_ms = limit.as_millis(), "source fetch timed out");
                None
            }
            None => None,
        };

        let (cpu, load) = match cpu {
            Some(stats) => (Some(stats.per_core), stats.load),
            None => (None, None),
        };
        let (disk, disk_io) = match disk {
            Some(stats) => (Some(stats.usage), Some(stats.io)),
            None => (None, None),
        };

        Snapshot {
            tick,
            taken_at: Utc::now(),
            cpu,
            load,
            memory: memory.map(|m| m.ram),
            swap: memory.map(|m| m.swap),
            disk,
            disk_io,
            network,
            namespaces,
        }
    }

    /// Start one detached task per probe target for this tick.
    fn launch_probes(&self, tick: u64, tx: &mpsc::UnboundedSender<Update>, cancel: &CancellationToken) {
        for target in &self.probes {
            let prober = Arc::clone(&self.prober);
            let target = target.clone();
            let tx = tx.clone();
            let cancel = cancel.clone();

            tokio::spawn(async move {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    healthy = prober.probe(&target) => {
                        let _ = tx.send(Update::Probe(ProbeOutcome {
                            name: target.name(),
                            tick,
                            healthy,
                        }));
                    }
                }
            });
        }
    }

    /// Tick until cancelled or until the receiver goes away.
    pub async fn run(mut self, tx: mpsc::UnboundedSender<Update>, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick: u64 = 0;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            tick += 1;
            self.launch_probes(tick, &tx, &cancel);

            let snapshot = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                snapshot = self.collect(tick) => snapshot,
            };

            if tx.send(Update::Snapshot(Arc::new(snapshot))).is_err() {
                debug!("snapshot receiver dropped");
                break;
            }
        }

        debug!(ticks = tick, "aggregator stopped");
    }

    pub fn spawn(
        self,
        tx: mpsc::UnboundedSender<Update>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(tx, cancel))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicU64, Ordering};

    use futures_util::future::BoxFuture;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::CoreError;
    use crate::model::{
        CpuStats, DiskStats, InterfaceStats, MemoryUsage, NamespaceSummary, UsageStat,
    };
    use crate::source::{BoxSource, DiskSource, Domain, FakeDisks};

    const GIB: u64 = 1024 * 1024 * 1024;

    struct Fixed<T> {
        domain: Domain,
        value: T,
    }

    impl<T: Clone + Send + Sync> StatSource for Fixed<T> {
        type Output = T;

        fn domain(&self) -> Domain {
            self.domain
        }

        fn fetch(&self) -> BoxFuture<'_, Result<T, CoreError>> {
            let value = self.value.clone();
            Box::pin(async move { Ok(value) })
        }
    }

    fn fixed<T: Clone + Send + Sync + 'static>(domain: Domain, value: T) -> BoxSource<T> {
        Box::new(Fixed { domain, value })
    }

    /// Fails every fetch with the error produced by `make`.
    struct Failing<T> {
        domain: Domain,
        make: fn() -> CoreError,
        calls: Arc<AtomicU64>,
        _out: std::marker::PhantomData<fn() -> T>,
    }

    impl<T: Send> StatSource for Failing<T> {
        type Output = T;

        fn domain(&self) -> Domain {
            self.domain
        }

        fn fetch(&self) -> BoxFuture<'_, Result<T, CoreError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let err = (self.make)();
            Box::pin(async move { Err(err) })
        }
    }

    fn failing<T: Send + 'static>(
        domain: Domain,
        make: fn() -> CoreError,
        calls: &Arc<AtomicU64>,
    ) -> BoxSource<T> {
        Box::new(Failing {
            domain,
            make,
            calls: Arc::clone(calls),
            _out: std::marker::PhantomData,
        })
    }

    /// Reports how many times it has been fetched, with a delay so
    /// fetches of one tick overlap.
    struct Counting {
        calls: AtomicU64,
        delay: Duration,
    }

    impl StatSource for Counting {
        type Output = CpuStats;

        fn domain(&self) -> Domain {
            Domain::Cpu
        }

        fn fetch(&self) -> BoxFuture<'_, Result<CpuStats, CoreError>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(self.delay).await;
                #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                let usage = n as f64;
                Ok(CpuStats {
                    per_core: vec![usage],
                    load: None,
                })
            })
        }
    }

    struct CountingMemory {
        calls: AtomicU64,
    }

    impl StatSource for CountingMemory {
        type Output = MemoryUsage;

        fn domain(&self) -> Domain {
            Domain::Memory
        }

        fn fetch(&self) -> BoxFuture<'_, Result<MemoryUsage, CoreError>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(MemoryUsage {
                    ram: UsageStat::new(n, 100),
                    swap: UsageStat::default(),
                })
            })
        }
    }

    /// Never answers within any reasonable refresh period.
    struct Stalled<T> {
        domain: Domain,
        _out: std::marker::PhantomData<fn() -> T>,
    }

    impl<T: Send> StatSource for Stalled<T> {
        type Output = T;

        fn domain(&self) -> Domain {
            self.domain
        }

        fn fetch(&self) -> BoxFuture<'_, Result<T, CoreError>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(CoreError::unavailable("stalled", "woke up too late"))
            })
        }
    }

    fn stalled<T: Send + 'static>(domain: Domain) -> BoxSource<T> {
        Box::new(Stalled {
            domain,
            _out: std::marker::PhantomData,
        })
    }

    struct FakeProber {
        down: HashSet<String>,
    }

    impl Prober for FakeProber {
        fn probe<'a>(&'a self, target: &'a ProbeTarget) -> BoxFuture<'a, bool> {
            let healthy = !self.down.contains(&target.host);
            Box::pin(async move { healthy })
        }
    }

    fn iface(name: &str) -> InterfaceStats {
        InterfaceStats {
            name: name.into(),
            rx_bytes: 1024,
            ..InterfaceStats::default()
        }
    }

    fn healthy_sources() -> Sources {
        Sources {
            cpu: fixed(
                Domain::Cpu,
                CpuStats {
                    per_core: vec![12.5, 40.0],
                    load: None,
                },
            ),
            memory: fixed(
                Domain::Memory,
                MemoryUsage {
                    ram: UsageStat::new(4 * GIB, 16 * GIB),
                    swap: UsageStat::new(0, 2 * GIB),
                },
            ),
            disk: fixed(Domain::Disk, DiskStats::default()),
            network: fixed(
                Domain::Network,
                BTreeMap::from([("eth0".to_string(), iface("eth0"))]),
            ),
            cluster: None,
        }
    }

    fn aggregator(sources: Sources, down: &[&str]) -> Aggregator {
        let prober = FakeProber {
            down: down.iter().map(ToString::to_string).collect(),
        };
        Aggregator::new(sources, Arc::new(prober), &MonitorConfig::default())
    }

    #[tokio::test]
    async fn snapshot_carries_each_domain() {
        let mut sources = healthy_sources();
        sources.disk = Box::new(DiskSource::new(FakeDisks {
            mounts: vec!["/", "/mnt/broken"],
            broken: vec!["/mnt/broken"],
            io_fails: false,
        }));
        let mut agg = aggregator(sources, &[]);

        let snap = agg.collect(1).await;

        assert_eq!(snap.tick, 1);
        assert_eq!(snap.cpu, Some(vec![12.5, 40.0]));
        let memory = snap.memory.unwrap();
        assert!((memory.used_percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(snap.swap.unwrap().total, 2 * GIB);
        assert!(snap.disk.as_ref().unwrap().contains_key("/"));
        assert!(!snap.disk.as_ref().unwrap().contains_key("/mnt/broken"));
        assert!(snap.interface("eth0").is_some());
        assert_eq!(snap.namespaces, None);
    }

    #[tokio::test]
    async fn failing_source_only_blanks_its_domain() {
        let calls = Arc::new(AtomicU64::new(0));
        let mut sources = healthy_sources();
        sources.cpu = failing(
            Domain::Cpu,
            || CoreError::unavailable("cpu", "boom"),
            &calls,
        );
        let mut agg = aggregator(sources, &[]);

        let snap = agg.collect(3).await;

        assert_eq!(snap.cpu, None);
        assert_eq!(snap.load, None);
        assert!(snap.memory.is_some());
        assert!(snap.disk.is_some());
        assert!(snap.network.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_cluster_config_disables_the_source() {
        let calls = Arc::new(AtomicU64::new(0));
        let mut sources = healthy_sources();
        sources.cluster = Some(failing::<Vec<NamespaceSummary>>(
            Domain::Cluster,
            || CoreError::ClusterConfigMissing {
                tried: "~/.kube/config".into(),
            },
            &calls,
        ));
        let mut agg = aggregator(sources, &[]);

        let first = agg.collect(1).await;
        let second = agg.collect(2).await;

        assert_eq!(first.namespaces, None);
        assert_eq!(second.namespaces, None);
        assert!(second.memory.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(agg.sources.cluster.is_none());
    }

    #[tokio::test]
    async fn transient_cluster_errors_are_retried_next_tick() {
        let calls = Arc::new(AtomicU64::new(0));
        let mut sources = healthy_sources();
        sources.cluster = Some(failing::<Vec<NamespaceSummary>>(
            Domain::Cluster,
            || CoreError::unavailable("cluster", "api server unreachable"),
            &calls,
        ));
        let mut agg = aggregator(sources, &[]);

        agg.collect(1).await;
        agg.collect(2).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(agg.sources.cluster.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn published_snapshots_never_mix_ticks() {
        let mut sources = healthy_sources();
        sources.cpu = Box::new(Counting {
            calls: AtomicU64::new(0),
            delay: Duration::from_millis(300),
        });
        sources.memory = Box::new(CountingMemory {
            calls: AtomicU64::new(0),
        });
        let agg = aggregator(sources, &[]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = agg.spawn(tx, cancel.clone());

        let mut seen = 0;
        while seen < 3 {
            if let Some(Update::Snapshot(snap)) = rx.recv().await {
                seen += 1;
                #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                let expected = snap.tick as f64;
                assert_eq!(snap.cpu, Some(vec![expected]));
                assert_eq!(snap.memory.unwrap().used, snap.tick);
            }
        }

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_sources_do_not_hold_up_the_cadence() {
        let mut sources = healthy_sources();
        sources.disk = stalled(Domain::Disk);
        sources.cluster = Some(stalled::<Vec<NamespaceSummary>>(Domain::Cluster));
        let agg = aggregator(sources, &[]);
        let period = MonitorConfig::default().refresh_interval;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = agg.spawn(tx, cancel.clone());

        let start = tokio::time::Instant::now();
        let mut ticks = Vec::new();
        while ticks.len() < 5 {
            if let Some(Update::Snapshot(snap)) = rx.recv().await {
                assert_eq!(snap.disk, None);
                assert_eq!(snap.namespaces, None);
                assert_eq!(snap.cpu, Some(vec![12.5, 40.0]));
                assert!(snap.memory.is_some());
                ticks.push(snap.tick);
            }
        }

        // Five snapshots well inside the 30s the stalled sources sleep.
        assert_eq!(ticks, vec![1, 2, 3, 4, 5]);
        assert!(start.elapsed() <= period * 6);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn probes_report_independently() {
        let agg = aggregator(healthy_sources(), &["keycloak.admin.uds.dev"]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = agg.spawn(tx, cancel.clone());

        let mut outcomes = BTreeMap::new();
        while outcomes.len() < 3 {
            if let Some(Update::Probe(outcome)) = rx.recv().await {
                assert_eq!(outcome.tick, 1);
                outcomes.insert(outcome.name, outcome.healthy);
            }
        }

        cancel.cancel();
        handle.await.unwrap();

        assert!(!outcomes["keycloak.admin.uds.dev"]);
        assert!(outcomes["runtime.uds.dev"]);
        assert!(outcomes["ping 10.0.0.1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let agg = aggregator(healthy_sources(), &[]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = agg.spawn(tx, cancel.clone());

        cancel.cancel();
        handle.await.unwrap();

        // Drain whatever the first tick managed to send; the channel
        // then closes because every sender is gone.
        while rx.recv().await.is_some() {}
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_stops_the_loop() {
        let agg = aggregator(healthy_sources(), &[]);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let handle = agg.spawn(tx, CancellationToken::new());
        handle.await.unwrap();
    }
}
