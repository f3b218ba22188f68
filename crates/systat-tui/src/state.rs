//! Which table has focus and which view is showing.
//!
//! Only the app loop mutates this, and only through the transitions
//! below, so the invariants hold by construction:
//! exactly one table is focused, the detail view is entered only from
//! the Network table, and it is left only by an explicit close.

use std::fmt;

/// The focusable tables, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Cpu,
    Disk,
    Network,
}

impl Focus {
    pub const ALL: [Self; 3] = [Self::Cpu, Self::Disk, Self::Network];

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Cpu => Self::Disk,
            Self::Disk => Self::Network,
            Self::Network => Self::Cpu,
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "CPU",
            Self::Disk => "Disk",
            Self::Network => "Network",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    InterfaceDetail(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    focus: Focus,
    view: View,
    viewport: (u16, u16),
}

impl ViewState {
    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn in_detail(&self) -> bool {
        matches!(self.view, View::InterfaceDetail(_))
    }

    /// Advance focus, wrapping. No-op outside the dashboard view.
    pub fn cycle_focus(&mut self) -> bool {
        if self.in_detail() {
            return false;
        }
        self.focus = self.focus.next();
        true
    }

    /// Enter the detail view for `iface`. Only valid from the dashboard
    /// with the Network table focused.
    pub fn open_detail(&mut self, iface: impl Into<String>) -> bool {
        if self.in_detail() || self.focus != Focus::Network {
            return false;
        }
        self.view = View::InterfaceDetail(iface.into());
        true
    }

    /// Back to the dashboard. Only valid from the detail view.
    pub fn close_detail(&mut self) -> bool {
        if !self.in_detail() {
            return false;
        }
        self.view = View::Dashboard;
        true
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn network_focused() -> ViewState {
        let mut state = ViewState::default();
        state.cycle_focus();
        state.cycle_focus();
        assert_eq!(state.focus(), Focus::Network);
        state
    }

    #[test]
    fn three_cycles_return_to_start() {
        for start in Focus::ALL {
            let mut state = ViewState {
                focus: start,
                ..ViewState::default()
            };
            for _ in 0..3 {
                assert!(state.cycle_focus());
            }
            assert_eq!(state.focus(), start);
        }
    }

    #[test]
    fn detail_requires_network_focus() {
        let mut state = ViewState::default();
        assert!(!state.open_detail("eth0"));
        assert_eq!(state.view(), &View::Dashboard);

        state.cycle_focus();
        assert!(!state.open_detail("eth0"));

        state.cycle_focus();
        assert!(state.open_detail("eth0"));
        assert_eq!(state.view(), &View::InterfaceDetail("eth0".into()));
    }

    #[test]
    fn detail_view_ignores_everything_but_close() {
        let mut state = network_focused();
        state.open_detail("eth0");

        assert!(!state.cycle_focus());
        assert!(!state.open_detail("wlan0"));
        state.resize(100, 40);
        assert_eq!(state.view(), &View::InterfaceDetail("eth0".into()));
        assert_eq!(state.focus(), Focus::Network);

        assert!(state.close_detail());
        assert_eq!(state.view(), &View::Dashboard);
        assert_eq!(state.focus(), Focus::Network);
    }

    #[test]
    fn close_outside_detail_is_a_no_op() {
        let mut state = ViewState::default();
        assert!(!state.close_detail());
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn resize_keeps_focus_and_view() {
        let mut state = network_focused();
        state.resize(200, 50);
        assert_eq!(state.viewport(), (200, 50));
        assert_eq!(state.focus(), Focus::Network);
        assert_eq!(state.view(), &View::Dashboard);
    }
}
