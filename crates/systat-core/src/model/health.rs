use serde::{Deserialize, Serialize};

/// A probe result, tagged with the tick that launched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub name: String,
    pub tick: u64,
    pub healthy: bool,
}

/// One named health entry. `status` is `None` until the first probe
/// for it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: Option<bool>,
    #[serde(skip)]
    last_tick: Option<u64>,
}

/// Ordered set of health entries, identified by name.
///
/// Entries are updated one at a time as their probes resolve; an entry
/// keeps its last status until a newer probe for the same name lands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthChecks {
    entries: Vec<HealthCheck>,
}

impl HealthChecks {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names
                .into_iter()
                .map(|name| HealthCheck {
                    name: name.into(),
                    status: None,
                    last_tick: None,
                })
                .collect(),
        }
    }

    /// Record a probe result. Returns `true` when the entry changed.
    ///
    /// Unknown names are ignored, as are outcomes older than the one
    /// already recorded (a slow probe from an earlier tick).
    pub fn apply(&mut self, outcome: &ProbeOutcome) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.name == outcome.name) else {
            return false;
        };
        if entry.last_tick.is_some_and(|t| outcome.tick < t) {
            return false;
        }
        entry.last_tick = Some(outcome.tick);
        let changed = entry.status != Some(outcome.healthy);
        entry.status = Some(outcome.healthy);
        changed
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HealthCheck> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
