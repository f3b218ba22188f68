// ── Health-check probes ──
//
// A probe answers one question, "is this target reachable right now",
// within a bounded time. A timeout or any failure is a negative result,
// never an error.

use std::fmt::Display;
use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use tokio::process::Command;
use tracing::debug;

use crate::config::{ProbeKind, ProbeTarget};
use crate::error::CoreError;

pub trait Prober: Send + Sync + 'static {
    fn probe<'a>(&'a self, target: &'a ProbeTarget) -> BoxFuture<'a, bool>;
}

/// Name resolution behind the DNS probe. `Ok` means the name resolved
/// to at least one address.
pub trait HostLookup: Send + Sync + 'static {
    fn lookup<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<(), CoreError>>;
}

/// The host's resolver configuration, queried through hickory.
///
/// One attempt per query and no cache, so every probe asks the network
/// and a dropped probe leaves nothing running.
pub struct SystemLookup {
    resolver: TokioAsyncResolver,
}

impl SystemLookup {
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()
            .unwrap_or_else(|e| {
                debug!(error = %e, "system resolver config unreadable, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            });
        opts.attempts = 1;
        opts.timeout = timeout;
        opts.cache_size = 0;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl HostLookup for SystemLookup {
    fn lookup<'a>(&'a self, host: &'a str) -> BoxFuture<'a, Result<(), CoreError>> {
        Box::pin(async move {
            let failed = |reason: String| CoreError::Dns {
                domain: host.to_string(),
                server: "system resolver".into(),
                reason,
            };

            let answer = self
                .resolver
                .lookup_ip(host)
                .await
                .map_err(|e| failed(e.to_string()))?;
            if answer.iter().next().is_none() {
                return Err(failed("no addresses".into()));
            }
            Ok(())
        })
    }
}

/// Probes through the host's resolver and `ping` binary.
#[derive(Clone)]
pub struct SystemProber {
    timeout: Duration,
    lookup: Arc<dyn HostLookup>,
    ping_program: String,
}

impl SystemProber {
    pub fn new(timeout: Duration) -> Self {
        Self::with_lookup(timeout, SystemLookup::new(timeout))
    }

    pub fn with_lookup(timeout: Duration, lookup: impl HostLookup) -> Self {
        Self {
            timeout,
            lookup: Arc::new(lookup),
            ping_program: "ping".into(),
        }
    }

    /// Run this program with `ping`'s arguments for echo probes.
    pub fn with_ping_program(mut self, program: impl Into<String>) -> Self {
        self.ping_program = program.into();
        self
    }

    async fn resolve(&self, host: &str) -> bool {
        bounded(self.timeout, host, "dns", self.lookup.lookup(host))
            .await
            .is_some()
    }

    async fn ping(&self, host: &str) -> bool {
        let mut cmd = Command::new(&self.ping_program);
        cmd.args(ping_args(host))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        bounded(self.timeout, host, "ping", cmd.status())
            .await
            .is_some_and(|status| status.success())
    }
}

/// Await `work` for at most `limit`. Failures and timeouts are logged
/// and come back as `None`.
async fn bounded<T, E: Display>(
    limit: Duration,
    host: &str,
    kind: &str,
    work: impl Future<Output = Result<T, E>>,
) -> Option<T> {
    match tokio::time::timeout(limit, work).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            debug!(host, kind, error = %e, "probe failed");
            None
        }
        Err(_) => {
            debug!(host, kind, limit_ms = limit.as_millis(), "probe timed out");
            None
        }
    }
}

/// One echo request with a one-second reply deadline.
fn ping_args(host: &str) -> Vec<String> {
    let args: &[&str] = if cfg!(windows) {
        &["-n", "1", "-w", "1000"]
    } else if cfg!(target_os = "macos") {
        &["-c", "1", "-W", "1000"]
    } else {
        &["-c", "1", "-W", "1"]
    };
    args.iter()
        .map(ToString::to_string)
        .chain(std::iter::once(host.to_string()))
        .collect()
}

impl Prober for SystemProber {
    fn probe<'a>(&'a self, target: &'a ProbeTarget) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            match target.kind {
                ProbeKind::Dns => self.resolve(&target.host).await,
                ProbeKind::Ping => self.ping(&target.host).await,
            }
        })
    }
}
