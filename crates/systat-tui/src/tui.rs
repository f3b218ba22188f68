//! Owning the terminal while the dashboard runs.
//!
//! [`Tui::start`] switches the terminal over and the returned value puts
//! it back exactly once, whether through [`Tui::stop`], `Drop`, or the
//! panic hook.

use std::io::{Stdout, stdout};
use std::panic::PanicHookInfo;

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub type Backend = CrosstermBackend<Stdout>;

pub struct Tui {
    terminal: Terminal<Backend>,
    active: bool,
}

impl Tui {
    /// Raw mode, alternate screen, hidden cursor. A failure part way
    /// through undoes the steps already taken.
    pub fn start() -> Result<Self> {
        let mut tui = Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
            active: true,
        };
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        tui.terminal.clear()?;
        Ok(tui)
    }

    /// Hand the terminal back to the shell. Later calls do nothing.
    pub fn stop(&mut self) {
        if std::mem::take(&mut self.active) {
            restore();
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// (cols, rows)
    pub fn size(&self) -> Result<(u16, u16)> {
        let area = self.terminal.size()?;
        Ok((area.width, area.height))
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Best effort; every step runs even if an earlier one failed.
fn restore() {
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

// ── Hooks ──

/// Error and panic reporting that leaves a usable shell behind.
///
/// Install before [`Tui::start`] so start-up failures print cleanly.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let eyre_panic = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        if cfg!(debug_assertions) {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .create_panic_handler()(info);
        } else {
            write_crash_report(info);
            eyre_panic(info);
        }
    }));

    Ok(())
}

/// Release builds dump a report file and point the user at it.
fn write_crash_report(info: &PanicHookInfo<'_>) {
    let metadata = human_panic::Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .homepage(env!("CARGO_PKG_HOMEPAGE"));
    let report = human_panic::handle_dump(&metadata, info);
    let _ = human_panic::print_msg(report, &metadata);
}
