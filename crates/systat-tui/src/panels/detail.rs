//! Full counters for one interface, drawn over the whole frame.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use systat_core::InterfaceStats;

use crate::fmt::fmt_bytes;
use crate::panels::table::panel_block;
use crate::theme;

pub const RETURN_HINT: &str = "Press ESC to return";
pub const NOT_FOUND: &str = "Interface not found";

fn counter_row(label: &'static str, rx: String, tx: String) -> Row<'static> {
    Row::new(vec![Cell::from(label), Cell::from(rx), Cell::from(tx)]).style(theme::table_row())
}

/// `stats` is `None` when the interface vanished since it was selected.
pub fn render_detail(frame: &mut Frame, area: Rect, name: &str, stats: Option<&InterfaceStats>) {
    let block = panel_block(&format!("Interface {name}"), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body, hint] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(RETURN_HINT, theme::key_hint()))),
        hint,
    );

    let Some(stats) = stats else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(NOT_FOUND, theme::no_data()))),
            body,
        );
        return;
    };

    let [info, counters] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(body);

    let addresses = if stats.ipv4.is_empty() {
        "-".to_owned()
    } else {
        stats.ipv4_list()
    };
    let info_lines = vec![
        Line::from(vec![
            Span::styled("Name  ", theme::key_hint()),
            Span::styled(stats.name.clone(), theme::title_style()),
        ]),
        Line::from(vec![
            Span::styled("MAC   ", theme::key_hint()),
            Span::styled(stats.mac.clone(), theme::table_row()),
        ]),
        Line::from(vec![
            Span::styled("IPv4  ", theme::key_hint()),
            Span::styled(addresses, theme::table_row()),
        ]),
    ];
    frame.render_widget(Paragraph::new(info_lines), info);

    let rows = vec![
        counter_row("Bytes", fmt_bytes(stats.rx_bytes), fmt_bytes(stats.tx_bytes)),
        counter_row(
            "Packets",
            stats.rx_packets.to_string(),
            stats.tx_packets.to_string(),
        ),
        counter_row(
            "Errors",
            stats.rx_errors.to_string(),
            stats.tx_errors.to_string(),
        ),
        counter_row(
            "Dropped",
            stats.rx_dropped.to_string(),
            stats.tx_dropped.to_string(),
        ),
    ];
    let header = Row::new(["", "RX", "TX"]).style(theme::table_header());
    let widths = [
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    frame.render_widget(Table::new(rows, widths).header(header), counters);
}
