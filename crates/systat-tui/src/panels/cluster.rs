//! Kubernetes namespaces. Hidden until the cluster source has answered
//! at least once.

use chrono::Utc;
use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table},
};

use systat_core::NamespaceSummary;

use crate::action::Action;
use crate::component::Component;
use crate::fmt::{fmt_age, health_glyph};
use crate::panels::table::{panel_block, render_no_data};
use crate::theme;

#[derive(Default)]
pub struct ClusterPanel {
    namespaces: Option<Vec<NamespaceSummary>>,
    seen: bool,
}

impl ClusterPanel {
    pub fn visible(&self) -> bool {
        self.seen
    }
}

impl Component for ClusterPanel {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.namespaces.clone_from(&snapshot.namespaces);
            self.seen |= self.namespaces.is_some();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Cluster", false);
        let Some(namespaces) = &self.namespaces else {
            render_no_data(frame, area, block);
            return;
        };

        let now = Utc::now();
        let rows: Vec<Row> = namespaces
            .iter()
            .map(|ns| {
                Row::new(vec![
                    Cell::from(ns.name.clone()),
                    Cell::from(health_glyph(Some(ns.is_active()))),
                    Cell::from(ns.created.map(|c| fmt_age(c, now)).unwrap_or_default()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let header = Row::new(["Namespace", "Status", "Age"]).style(theme::table_header());
        let widths = [
            Constraint::Fill(1),
            Constraint::Length(6),
            Constraint::Length(8),
        ];
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn id(&self) -> &str {
        "cluster"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use systat_core::Snapshot;

    use super::*;

    fn snapshot(namespaces: Option<Vec<NamespaceSummary>>) -> Action {
        Action::SnapshotUpdated(Arc::new(Snapshot {
            namespaces,
            ..Snapshot::empty()
        }))
    }

    #[test]
    fn appears_after_first_answer_and_stays() {
        let mut panel = ClusterPanel::default();
        panel.update(&snapshot(None)).unwrap();
        assert!(!panel.visible());

        panel.update(&snapshot(Some(Vec::new()))).unwrap();
        assert!(panel.visible());

        panel.update(&snapshot(None)).unwrap();
        assert!(panel.visible());
    }
}
