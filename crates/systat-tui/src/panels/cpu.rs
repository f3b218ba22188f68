//! Per-core CPU usage with the load average underneath.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use systat_core::LoadAverage;

use crate::action::Action;
use crate::component::Component;
use crate::fmt::fmt_percent;
use crate::input::{Input, classify};
use crate::panels::table::{Selection, panel_block, render_no_data};
use crate::theme;

#[derive(Default)]
pub struct CpuPanel {
    cores: Option<Vec<f64>>,
    load: Option<LoadAverage>,
    selection: Selection,
    focused: bool,
}

impl CpuPanel {
    fn load_line(&self) -> Line<'static> {
        let text = match self.load {
            Some(l) => format!("Load: {:.2} {:.2} {:.2}", l.one, l.five, l.fifteen),
            None => "Load: n/a".to_owned(),
        };
        Line::from(Span::styled(text, theme::key_hint()))
    }
}

impl Component for CpuPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(Input::Navigate(nav)) = classify(key) {
            self.selection.navigate(nav);
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.cores.clone_from(&snapshot.cpu);
            self.load = snapshot.load;
            self.selection
                .set_len(self.cores.as_ref().map_or(0, Vec::len));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("CPU", self.focused);
        let Some(cores) = &self.cores else {
            render_no_data(frame, area, block);
            return;
        };

        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [table_area, load_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        let header = Row::new(vec![Cell::from("Core"), Cell::from("Usage")])
            .style(theme::table_header());
        let rows: Vec<Row> = cores
            .iter()
            .enumerate()
            .map(|(i, usage)| {
                Row::new(vec![
                    Cell::from(format!("cpu{i}")),
                    Cell::from(fmt_percent(*usage)).style(theme::usage_style(*usage)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(8), Constraint::Fill(1)])
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self
            .selection
            .render_state(table_area.height.saturating_sub(1));
        frame.render_stateful_widget(table, table_area, &mut state);
        frame.render_widget(Paragraph::new(self.load_line()), load_area);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "cpu"
    }
}
