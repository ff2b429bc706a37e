//! Key bindings
//!
//! Left paddle: W / S. Right paddle: Up / Down (these drive the left paddle
//! when it is the only human). P or Space pauses, Q or Esc backs out,
//! Ctrl-C leaves from anywhere. Key releases are ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::MatchInput;
use crate::sim::{GameMode, Intent, Side};

/// Navigation keys for the blocking screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Confirm,
    Back,
    Exit,
    Backspace,
    Char(char),
}

fn is_press(key: &KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Decode a key during a match
pub fn match_input(key: &KeyEvent, mode: GameMode) -> Option<MatchInput> {
    if !is_press(key) {
        return None;
    }
    if is_ctrl_c(key) {
        return Some(MatchInput::Exit);
    }
    let arrows = if mode == GameMode::PlayerVsCpu {
        Side::Left
    } else {
        Side::Right
    };
    let input = match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') => MatchInput::Move(Side::Left, Intent::Up),
        KeyCode::Char('s') | KeyCode::Char('S') => MatchInput::Move(Side::Left, Intent::Down),
        KeyCode::Up => MatchInput::Move(arrows, Intent::Up),
        KeyCode::Down => MatchInput::Move(arrows, Intent::Down),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => MatchInput::TogglePause,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => MatchInput::Quit,
        _ => return None,
    };
    Some(input)
}

/// Decode a key on a blocking screen
pub fn nav_key(key: &KeyEvent) -> Option<NavKey> {
    if !is_press(key) {
        return None;
    }
    if is_ctrl_c(key) {
        return Some(NavKey::Exit);
    }
    let nav = match key.code {
        KeyCode::Up => NavKey::Up,
        KeyCode::Down => NavKey::Down,
        KeyCode::Enter => NavKey::Confirm,
        KeyCode::Esc => NavKey::Back,
        KeyCode::Backspace => NavKey::Backspace,
        KeyCode::Char(c) => NavKey::Char(c),
        _ => return None,
    };
    Some(nav)
}
