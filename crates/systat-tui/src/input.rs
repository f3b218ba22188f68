//! Key classification shared by the app loop and the panels.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Table navigation, handled by whichever table has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// What a key press means, independent of where it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    CycleFocus,
    Confirm,
    Cancel,
    Navigate(Nav),
}

pub fn classify(key: KeyEvent) -> Option<Input> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let input = match key.code {
        KeyCode::Char('c') if ctrl => Input::Quit,
        KeyCode::Char('u') if ctrl => Input::Navigate(Nav::PageUp),
        KeyCode::Char('d') if ctrl => Input::Navigate(Nav::PageDown),
        _ if ctrl => return None,
        KeyCode::Char('q') => Input::Quit,
        KeyCode::Tab => Input::CycleFocus,
        KeyCode::Enter => Input::Confirm,
        KeyCode::Esc => Input::Cancel,
        KeyCode::Up | KeyCode::Char('k') => Input::Navigate(Nav::Up),
        KeyCode::Down | KeyCode::Char('j') => Input::Navigate(Nav::Down),
        KeyCode::PageUp => Input::Navigate(Nav::PageUp),
        KeyCode::PageDown => Input::Navigate(Nav::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Input::Navigate(Nav::Home),
        KeyCode::End | KeyCode::Char('G') => Input::Navigate(Nav::End),
        _ => return None,
    };
    Some(input)
}
