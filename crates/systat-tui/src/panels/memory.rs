//! RAM and swap usage.

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table},
};

use systat_core::UsageStat;

use crate::action::Action;
use crate::component::Component;
use crate::fmt::{fmt_bytes, fmt_percent};
use crate::panels::table::{panel_block, render_no_data};
use crate::theme;

#[derive(Default)]
pub struct MemoryPanel {
    ram: Option<UsageStat>,
    swap: Option<UsageStat>,
}

fn usage_row(label: &'static str, stat: UsageStat) -> Row<'static> {
    Row::new(vec![
        Cell::from(label),
        Cell::from(fmt_bytes(stat.used)),
        Cell::from(fmt_bytes(stat.total)),
        Cell::from(fmt_percent(stat.used_percent)).style(theme::usage_style(stat.used_percent)),
    ])
    .style(theme::table_row())
}

impl Component for MemoryPanel {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.ram = snapshot.memory;
            self.swap = snapshot.swap;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Memory", false);
        let Some(ram) = self.ram else {
            render_no_data(frame, area, block);
            return;
        };

        let mut rows = vec![usage_row("RAM", ram)];
        if let Some(swap) = self.swap {
            rows.push(usage_row("Swap", swap));
        }

        let header = Row::new(["", "Used", "Total", "Used %"]).style(theme::table_header());
        let widths = [
            Constraint::Length(6),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(7),
        ];
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn id(&self) -> &str {
        "memory"
    }
}
