//! Keyboard, resize and frame-clock events for the dashboard loop.
//!
//! A background task merges the terminal's input stream with a frame
//! clock. Raw terminal events go through [`translate`], which keeps only
//! what the dashboard reacts to.

use std::io;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    /// Time to draw a frame.
    Render,
}

/// Map a terminal event to a dashboard event. Key releases and repeats,
/// mouse, focus and paste events map to `None`.
pub fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Read the controlling terminal, drawing a frame every `frame_period`.
    pub fn new(frame_period: Duration) -> Self {
        Self::from_input(EventStream::new(), frame_period)
    }

    fn from_input<S>(input: S, frame_period: Duration) -> Self
    where
        S: Stream<Item = io::Result<CrosstermEvent>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(input, frame_period, tx, cancel.clone()));
        Self { rx, cancel }
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Forward events until cancelled or the receiver goes away. Frames keep
/// coming after the input stream ends so the dashboard still refreshes.
async fn pump<S>(
    mut input: S,
    frame_period: Duration,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) where
    S: Stream<Item = io::Result<CrosstermEvent>> + Unpin,
{
    let mut frames = tokio::time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut input_open = true;

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = frames.tick() => Event::Render,
            next = input.next(), if input_open => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    debug!(error = %e, "terminal read failed");
                    continue;
                }
                None => {
                    debug!("terminal input closed");
                    input_open = false;
                    continue;
                }
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn only_key_presses_reach_the_dashboard() {
        let press = key(KeyCode::Char('q'), KeyEventKind::Press);
        assert_eq!(
            translate(press),
            Some(Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
        );
        assert_eq!(translate(key(KeyCode::Char('q'), KeyEventKind::Release)), None);
        assert_eq!(translate(key(KeyCode::Down, KeyEventKind::Repeat)), None);
    }

    #[test]
    fn resize_and_noise() {
        assert_eq!(
            translate(CrosstermEvent::Resize(120, 40)),
            Some(Event::Resize(120, 40))
        );
        assert_eq!(translate(CrosstermEvent::FocusGained), None);

        let click = CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(click), None);
    }

    #[tokio::test(start_paused = true)]
    async fn input_is_filtered_and_frames_outlive_it() {
        let input = futures::stream::iter(vec![
            Ok(key(KeyCode::Char('j'), KeyEventKind::Press)),
            Ok(key(KeyCode::Char('j'), KeyEventKind::Release)),
            Err(io::Error::other("tty gone")),
            Ok(CrosstermEvent::Resize(100, 30)),
        ]);
        let mut reader = EventReader::from_input(input, Duration::from_millis(33));

        let mut seen = Vec::new();
        let mut frames = 0;
        while frames < 3 {
            match reader.next().await.unwrap() {
                Event::Render => frames += 1,
                other => seen.push(other),
            }
        }
        reader.stop();

        assert_eq!(
            seen,
            vec![
                Event::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)),
                Event::Resize(100, 30),
            ]
        );
    }
}
