//! Shared pieces for the table panels: block chrome and row selection.

use std::cell::Cell;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, TableState},
};

use crate::input::Nav;
use crate::theme;

/// Marker prefixed to the focused panel's title.
pub const FOCUS_MARKER: &str = "●";

/// Rounded panel border, highlighted and marked when focused.
pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let (border, label) = if focused {
        (theme::border_focused(), format!(" {FOCUS_MARKER} {title} "))
    } else {
        (theme::border_default(), format!(" {title} "))
    };
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Line::from(Span::styled(label, theme::title_style())))
}

/// Placeholder for a section whose source had nothing this tick.
pub fn render_no_data(frame: &mut Frame, area: Rect, block: Block<'_>) {
    let text = Paragraph::new(Line::from(Span::styled("No data", theme::no_data()))).block(block);
    frame.render_widget(text, area);
}

/// Selected row of a table, clamped to however many rows it has now.
#[derive(Debug, Default)]
pub struct Selection {
    state: TableState,
    len: usize,
    /// Rows visible at the last render; PgUp/PgDn move by this much.
    page: Cell<usize>,
}

impl Selection {
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Track a new row count, keeping the cursor in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.state.select(None);
        } else {
            let current = self.state.selected().unwrap_or(0);
            self.state.select(Some(current.min(len - 1)));
        }
    }

    /// Move the cursor to `index` if that row exists.
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.state.select(Some(index));
        }
    }

    pub fn navigate(&mut self, nav: Nav) {
        if self.len == 0 {
            return;
        }
        let last = self.len - 1;
        let current = self.state.selected().unwrap_or(0);
        let page = self.page.get().max(1);
        let next = match nav {
            Nav::Up => current.saturating_sub(1),
            Nav::Down => (current + 1).min(last),
            Nav::PageUp => current.saturating_sub(page),
            Nav::PageDown => (current + page).min(last),
            Nav::Home => 0,
            Nav::End => last,
        };
        self.state.select(Some(next));
    }

    /// Table state to render with, recording how many rows fit in
    /// `body_height` (the table area minus borders and header).
    pub fn render_state(&self, body_height: u16) -> TableState {
        self.page.set(usize::from(body_height));
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(len: usize, page: usize) -> Selection {
        let mut s = Selection::default();
        s.set_len(len);
        s.page.set(page);
        s
    }

    #[test]
    fn first_row_selected_once_rows_exist() {
        let mut s = Selection::default();
        assert_eq!(s.selected(), None);
        s.set_len(3);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn movement_clamps_at_both_ends() {
        let mut s = selection(3, 10);
        s.navigate(Nav::Up);
        assert_eq!(s.selected(), Some(0));
        s.navigate(Nav::Down);
        s.navigate(Nav::Down);
        s.navigate(Nav::Down);
        assert_eq!(s.selected(), Some(2));
    }

    #[test]
    fn paging_moves_by_visible_rows() {
        let mut s = selection(50, 10);
        s.navigate(Nav::PageDown);
        assert_eq!(s.selected(), Some(10));
        s.navigate(Nav::PageUp);
        s.navigate(Nav::PageUp);
        assert_eq!(s.selected(), Some(0));
        s.navigate(Nav::End);
        assert_eq!(s.selected(), Some(49));
        s.navigate(Nav::Home);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn select_ignores_rows_that_do_not_exist() {
        let mut s = selection(3, 10);
        s.select(2);
        assert_eq!(s.selected(), Some(2));
        s.select(7);
        assert_eq!(s.selected(), Some(2));
    }

    #[test]
    fn shrinking_pulls_the_cursor_back() {
        let mut s = selection(10, 5);
        s.navigate(Nav::End);
        s.set_len(4);
        assert_eq!(s.selected(), Some(3));
        s.set_len(0);
        assert_eq!(s.selected(), None);
        s.navigate(Nav::Down);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn focused_title_is_marked() {
        let block = panel_block("Disk", true);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = ratatui::buffer::Buffer::empty(area);
        ratatui::widgets::Widget::render(block, area, &mut buf);
        let top: String = (0..20u16).map(|x| buf[(x, 0u16)].symbol()).collect();
        assert!(top.contains("● Disk"), "{top}");
    }
}
