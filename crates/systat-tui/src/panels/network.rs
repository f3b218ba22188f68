//! Interface table. Enter opens the detail view for the selected row.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table},
};

use systat_core::InterfaceStats;

use crate::action::Action;
use crate::component::Component;
use crate::fmt::fmt_bytes;
use crate::input::{Input, classify};
use crate::panels::table::{Selection, panel_block, render_no_data};
use crate::theme;

#[derive(Default)]
pub struct NetworkPanel {
    interfaces: Option<Vec<InterfaceStats>>,
    selection: Selection,
    focused: bool,
}

impl NetworkPanel {
    /// Name of the highlighted interface, if any.
    pub fn selected_name(&self) -> Option<&str> {
        let idx = self.selection.selected()?;
        self.interfaces
            .as_ref()?
            .get(idx)
            .map(|iface| iface.name.as_str())
    }
}

impl Component for NetworkPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match classify(key) {
            Some(Input::Navigate(nav)) => {
                self.selection.navigate(nav);
                Ok(None)
            }
            Some(Input::Confirm) => Ok(self
                .selected_name()
                .map(|name| Action::OpenDetail(name.to_owned()))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            // Keep the cursor on the same interface as rows come and go.
            let previous = self.selected_name().map(str::to_owned);
            self.interfaces = snapshot
                .network
                .as_ref()
                .map(|n| n.values().cloned().collect());
            self.selection
                .set_len(self.interfaces.as_ref().map_or(0, Vec::len));

            let index = previous.and_then(|name| {
                self.interfaces
                    .as_ref()?
                    .iter()
                    .position(|iface| iface.name == name)
            });
            if let Some(index) = index {
                self.selection.select(index);
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block("Network", self.focused);
        let Some(interfaces) = &self.interfaces else {
            render_no_data(frame, area, block);
            return;
        };

        let header = Row::new(["Iface", "IPv4", "RX", "TX"])
            .style(theme::table_header());
        let rows: Vec<Row> = interfaces
            .iter()
            .map(|iface| {
                Row::new(vec![
                    Cell::from(iface.name.clone()),
                    Cell::from(iface.ipv4_list()),
                    Cell::from(fmt_bytes(iface.rx_bytes)),
                    Cell::from(fmt_bytes(iface.tx_bytes)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(16),
            Constraint::Fill(1),
            Constraint::Length(11),
            Constraint::Length(11),
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
        "network"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyModifiers};
    use systat_core::Snapshot;

    use super::*;

    fn snapshot_with(names: &[&str]) -> Action {
        let network: BTreeMap<String, InterfaceStats> = names
            .iter()
            .map(|n| {
                (
                    (*n).to_owned(),
                    InterfaceStats {
                        name: (*n).to_owned(),
                        ..InterfaceStats::default()
                    },
                )
            })
            .collect();
        Action::SnapshotUpdated(Arc::new(Snapshot {
            network: Some(network),
            ..Snapshot::empty()
        }))
    }

    fn panel_with(names: &[&str]) -> NetworkPanel {
        let mut panel = NetworkPanel::default();
        panel.update(&snapshot_with(names)).unwrap();
        panel
    }

    fn press(panel: &mut NetworkPanel, code: KeyCode) -> Option<Action> {
        panel
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn enter_opens_the_selected_interface() {
        let mut panel = panel_with(&["eth0", "lo", "wlan0"]);
        press(&mut panel, KeyCode::Down);
        let action = press(&mut panel, KeyCode::Enter);
        assert!(matches!(action, Some(Action::OpenDetail(name)) if name == "lo"));
    }

    #[test]
    fn enter_without_rows_does_nothing() {
        let mut panel = NetworkPanel::default();
        assert!(press(&mut panel, KeyCode::Enter).is_none());
    }

    #[test]
    fn selection_follows_the_interface_when_rows_shift() {
        let mut panel = panel_with(&["eth0", "lo", "wlan0"]);
        press(&mut panel, KeyCode::Down);
        assert_eq!(panel.selected_name(), Some("lo"));

        // A new veth sorts ahead of the selected row.
        panel.update(&snapshot_with(&["eth0", "lo", "veth1a2b", "wlan0"])).unwrap();
        panel.update(&snapshot_with(&["cni0", "eth0", "lo", "wlan0"])).unwrap();
        assert_eq!(panel.selected_name(), Some("lo"));

        let action = press(&mut panel, KeyCode::Enter);
        assert!(matches!(action, Some(Action::OpenDetail(name)) if name == "lo"));
    }

    #[test]
    fn vanished_interface_leaves_the_cursor_in_range() {
        let mut panel = panel_with(&["eth0", "lo", "wlan0"]);
        press(&mut panel, KeyCode::End);
        assert_eq!(panel.selected_name(), Some("wlan0"));

        panel.update(&snapshot_with(&["eth0", "lo"])).unwrap();
        assert_eq!(panel.selected_name(), Some("lo"));
    }
}
