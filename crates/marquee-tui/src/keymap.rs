use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use marquee_core::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        let mut add_binding = |key_str: &str, action: Action| match parse_key_binding(key_str) {
            Some(binding) => {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            }
            None => warn!("Invalid key binding: '{}', ignoring", key_str),
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.move_down, Action::MoveDown);
        add_binding(&config.move_up, Action::MoveUp);
        add_binding(&config.leave, Action::Leave);
        add_binding(&config.toggle_loop, Action::ToggleLoop);
        add_binding(&config.toggle_hover_mode, Action::ToggleHoverMode);
        add_binding(&config.toggle_tooltip, Action::ToggleTooltip);
        add_binding(&config.restart, Action::Restart);

        // Ctrl+C always quits; arrows always move the keyboard pointer
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.entry(KeyBinding::simple(KeyCode::Up)).or_insert(Action::MoveUp);
        bindings.entry(KeyBinding::simple(KeyCode::Down)).or_insert(Action::MoveDown);

        Self { bindings }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "j", "k", "q", etc.
/// - Uppercase (Shift): "G", "N", etc.
/// - Ctrl: "<C-j>", Shift: "<S-Tab>"
/// - Special keys: "<CR>", "<Esc>", "<Tab>", "<Space>", arrows
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        if let Some(rest) = inner.strip_prefix("C-") {
            return parse_key_name(rest).map(KeyBinding::ctrl);
        }
        if let Some(rest) = inner.strip_prefix("S-") {
            return parse_key_name(rest).map(KeyBinding::shift);
        }
        return parse_key_name(inner).map(KeyBinding::simple);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_uppercase() {
        Some(KeyBinding::shift(KeyCode::Char(c)))
    } else {
        Some(KeyBinding::simple(KeyCode::Char(c)))
    }
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c.to_ascii_lowercase())),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            parse_key_binding("j"),
            Some(KeyBinding::simple(KeyCode::Char('j')))
        );
        assert_eq!(
            parse_key_binding("G"),
            Some(KeyBinding::shift(KeyCode::Char('G')))
        );
        assert_eq!(
            parse_key_binding("<C-l>"),
            Some(KeyBinding::ctrl(KeyCode::Char('l')))
        );
        assert_eq!(
            parse_key_binding("<Esc>"),
            Some(KeyBinding::simple(KeyCode::Esc))
        );
        assert_eq!(parse_key_binding("jj"), None);
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_keymap_from_config() {
        let keymap = Keymap::from_config(&KeymapConfig::default());
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('h'))),
            Some(&Action::ToggleHoverMode)
        );
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Esc)),
            Some(&Action::Leave)
        );
        assert_eq!(
            keymap.get(&KeyBinding::ctrl(KeyCode::Char('c'))),
            Some(&Action::Quit)
        );
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let config = KeymapConfig {
            restart: "q".to_string(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.get(&KeyBinding::simple(KeyCode::Char('q'))),
            Some(&Action::Quit)
        );
    }
}
