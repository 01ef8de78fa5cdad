use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

/// Anything that can hand over the key presses received since the last frame.
pub trait InputSource {
    fn poll_keys(&mut self) -> crossterm::Result<Vec<KeyEvent>>;
}

/// Arrow keys and WASD. Anything else is not a steering key.
pub fn direction_for(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Up),
        KeyCode::Down => Some(Down),
        KeyCode::Left => Some(Left),
        KeyCode::Right => Some(Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Up),
            'a' => Some(Left),
            's' => Some(Down),
            'd' => Some(Right),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
