//! Reachability checks, updated one entry at a time as probes resolve.

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use systat_core::HealthChecks;

use crate::action::Action;
use crate::component::Component;
use crate::fmt::health_glyph;
use crate::panels::table::panel_block;
use crate::theme;

pub struct HealthPanel {
    checks: HealthChecks,
}

impl HealthPanel {
    pub fn new(checks: HealthChecks) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &HealthChecks {
        &self.checks
    }
}

impl Component for HealthPanel {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ProbeResolved(outcome) = action {
            self.checks.apply(outcome);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .checks
            .iter()
            .map(|check| {
                Line::from(vec![
                    Span::raw(health_glyph(check.status)),
                    Span::raw(" "),
                    Span::styled(check.name.clone(), theme::table_row()),
                ])
            })
            .collect();
        let block = panel_block("Health", false);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn id(&self) -> &str {
        "health"
    }
}
