use marquee_core::config::ThemeColorOverrides;
use ratatui::style::{Color, Modifier, Style};

/// Runtime colors for the demo host
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    /// Marks rows whose current frame requests a transition
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg: Color::Rgb(0x28, 0x28, 0x28),
            fg: Color::Rgb(0xd4, 0xbe, 0x98),
            dim: Color::Rgb(0x7c, 0x6f, 0x64),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            highlight: Color::Rgb(0xd8, 0xa6, 0x57),
        }
    }
}

impl Theme {
    /// Default palette with any configured overrides applied
    pub fn from_overrides(overrides: &ThemeColorOverrides) -> Self {
        let mut theme = Self::default();
        let apply = |slot: &mut Color, value: &Option<String>| {
            if let Some(color) = value.as_deref().and_then(parse_hex_color) {
                *slot = color;
            } else if let Some(value) = value {
                tracing::warn!("Invalid color override '{}', keeping default", value);
            }
        };
        apply(&mut theme.bg, &overrides.bg);
        apply(&mut theme.fg, &overrides.fg);
        apply(&mut theme.dim, &overrides.dim);
        apply(&mut theme.accent, &overrides.accent);
        apply(&mut theme.highlight, &overrides.highlight);
        theme
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn hovered(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn transition(&self) -> Style {
        Style::default().fg(self.highlight).bg(self.bg)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.dim)
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}
