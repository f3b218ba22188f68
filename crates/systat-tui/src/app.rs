//! Application core: event loop, view transitions, action dispatch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use systat_core::{HealthChecks, MonitorConfig, ProbeTarget, Snapshot};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::input::{Input, classify};
use crate::layout::{arrangement, dashboard_areas};
use crate::panels::Panels;
use crate::panels::detail::render_detail;
use crate::state::{View, ViewState};
use crate::theme;
use crate::tui::Tui;

const RENDER_RATE: Duration = Duration::from_millis(33);

/// Top-level dashboard state and event loop.
pub struct App {
    state: ViewState,
    panels: Panels,
    /// Latest complete snapshot; the detail view reads from it directly.
    snapshot: Arc<Snapshot>,
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    monitor: MonitorConfig,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(monitor: MonitorConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let checks = HealthChecks::new(monitor.probes.iter().map(ProbeTarget::name));

        Self {
            state: ViewState::default(),
            panels: Panels::new(checks),
            snapshot: Arc::new(Snapshot::empty()),
            running: true,
            action_tx,
            action_rx,
            monitor,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run until the user quits. Owns the terminal for the duration.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start()?;
        let (width, height) = tui.size().unwrap_or((80, 24));
        self.state.resize(width, height);

        tokio::spawn(crate::data_bridge::spawn_data_bridge(
            self.monitor.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(RENDER_RATE);
        info!("dashboard event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        tui.stop();
        info!("dashboard event loop ended");
        Ok(())
    }

    /// Map a key to an action. Quit works everywhere; the detail view
    /// only listens for cancel; everything else on the dashboard goes to
    /// the focused table.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(input) = classify(key) else {
            return Ok(None);
        };

        match input {
            Input::Quit => Ok(Some(Action::Quit)),
            Input::Cancel => Ok(self.state.in_detail().then_some(Action::CloseDetail)),
            _ if self.state.in_detail() => Ok(None),
            Input::CycleFocus => Ok(Some(Action::CycleFocus)),
            Input::Confirm | Input::Navigate(_) => self
                .panels
                .focusable_mut(self.state.focus())
                .handle_key_event(key),
        }
    }

    /// Apply one action to the view state, then let every panel see it.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => self.state.resize(*w, *h),
            Action::CycleFocus => {
                if self.state.cycle_focus() {
                    let focus = self.state.focus();
                    self.panels.focus(focus);
                    debug!(panel = self.panels.focusable_mut(focus).id(), "focus moved");
                }
            }
            Action::OpenDetail(name) => {
                if self.state.open_detail(name.as_str()) {
                    debug!(iface = %name, "opened interface detail");
                }
            }
            Action::CloseDetail => {
                self.state.close_detail();
            }
            Action::SnapshotUpdated(snapshot) => {
                if snapshot.tick < self.snapshot.tick {
                    return Ok(());
                }
                self.snapshot = Arc::clone(snapshot);
            }
            Action::ProbeResolved(_) | Action::Render => {}
        }

        for panel in self.panels.all_mut() {
            if let Some(follow_up) = panel.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.state.viewport().0 == 0 {
            frame.render_widget(Paragraph::new("Loading..."), area);
            return;
        }

        match self.state.view() {
            View::InterfaceDetail(name) => {
                render_detail(frame, area, name, self.snapshot.interface(name));
            }
            View::Dashboard => self.render_dashboard(frame, area),
        }
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let show_cluster = self.panels.cluster.visible();
        let areas = dashboard_areas(
            area,
            arrangement(area.width),
            self.panels.health.checks().len(),
            show_cluster,
        );

        frame.render_widget(Paragraph::new(self.header_line()), areas.header);
        self.panels.health.render(frame, areas.health);
        self.panels.cpu.render(frame, areas.cpu);
        self.panels.memory.render(frame, areas.memory);
        self.panels.disk.render(frame, areas.disk);
        self.panels.network.render(frame, areas.network);
        if let Some(cluster) = areas.cluster {
            self.panels.cluster.render(frame, cluster);
        }
        frame.render_widget(Paragraph::new(footer_line()), areas.footer);
    }

    fn header_line(&self) -> Line<'static> {
        let status = if self.snapshot.tick == 0 {
            "waiting for first refresh".to_owned()
        } else {
            format!(
                "tick {} · updated {}",
                self.snapshot.tick,
                self.snapshot.taken_at.format("%H:%M:%S")
            )
        };
        Line::from(vec![
            Span::styled(" systat ", theme::title_style()),
            Span::styled(status, theme::key_hint()),
        ])
    }
}

fn footer_line() -> Line<'static> {
    let hints = [
        ("q", "quit"),
        ("tab", "focus"),
        ("↑↓", "move"),
        ("enter", "details"),
        ("esc", "back"),
    ];
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
        spans.push(Span::styled(format!(" {label} "), theme::key_hint()));
    }
    Line::from(spans)
}
