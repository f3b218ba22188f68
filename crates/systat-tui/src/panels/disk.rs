//! Mounted partitions, fullest first.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table},
};

use systat_core::PartitionUsage;

use crate::action::Action;
use crate::component::Component;
use crate::fmt::{fmt_bytes, fmt_percent};
use crate::input::{Input, classify};
use crate::panels::table::{Selection, panel_block, render_no_data};
use crate::theme;

#[derive(Default)]
pub struct DiskPanel {
    partitions: Option<Vec<PartitionUsage>>,
    selection: Selection,
    focused: bool,
}

impl Component for DiskPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(Input::Navigate(nav)) = classify(key) {
            self.selection.navigate(nav);
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.partitions = snapshot
                .disk
                .is_some()
                .then(|| snapshot.disks_by_usage().into_iter().cloned().collect());
            self.selection
                .set_len(self.partitions.as_ref().map_or(0, Vec::len));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Disk", self.focused);
        let Some(partitions) = &self.partitions else {
            render_no_data(frame, area, block);
            return;
        };

        let header = Row::new(["Device", "Mount", "Used", "Total", "Used %"])
            .style(theme::table_header());
        let rows: Vec<Row> = partitions
            .iter()
            .map(|p| {
                let pct = p.usage.used_percent;
                Row::new(vec![
                    Cell::from(p.device.clone()),
                    Cell::from(p.mount_point.clone()),
                    Cell::from(fmt_bytes(p.usage.used)),
                    Cell::from(fmt_bytes(p.usage.total)),
                    Cell::from(fmt_percent(pct)).style(theme::usage_style(pct)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(7),
        ];
        let inner_height = area.height.saturating_sub(3);
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected());

        let mut state = self.selection.render_state(inner_height);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "disk"
    }
}
