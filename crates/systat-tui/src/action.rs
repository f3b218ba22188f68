//! Every dashboard state change travels through an [`Action`].

use std::sync::Arc;

use systat_core::{ProbeOutcome, Snapshot};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Render,
    Resize(u16, u16),

    // ── Data ─────────────────────────────────────────────────────────
    SnapshotUpdated(Arc<Snapshot>),
    ProbeResolved(ProbeOutcome),

    // ── View ─────────────────────────────────────────────────────────
    CycleFocus,
    /// Show full counters for the named interface.
    OpenDetail(String),
    CloseDetail,
}
