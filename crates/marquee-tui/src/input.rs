use crossterm::event::KeyEvent;

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    Leave,
    ToggleLoop,
    ToggleHoverMode,
    ToggleTooltip,
    Restart,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);
    keymap.get(&binding).copied().unwrap_or(Action::None)
}
