//! Render hints: a side-effect-free view of how to present the current instant.

use serde::Serialize;

use crate::machine::{Marquee, Phase};

/// What the renderer needs for one redraw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderHints<'a> {
    /// Horizontal translation to apply to the text
    pub offset: f64,
    /// Request a smooth transition to `offset` (loop reset or hover settle).
    /// Ordinary ticks are discrete snaps and leave this unset.
    pub transition: bool,
    /// The untranslated text is showing and stable, so truncate it with an ellipsis
    pub ellipsis: bool,
    /// Pointer handlers are attached
    pub interactive: bool,
    /// Full text to expose as a hover title
    pub tooltip: Option<&'a str>,
}

/// Owned copy of [`RenderHints`] plus the phase, for publishing across tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HintsSnapshot {
    pub offset: f64,
    pub transition: bool,
    pub ellipsis: bool,
    pub interactive: bool,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Marquee {
    pub fn render_hints(&self) -> RenderHints<'_> {
        let interactive = self.is_overflowing();
        RenderHints {
            offset: self.offset,
            transition: self.start_of_loop || self.settling || self.phase == Phase::TrailingPause,
            ellipsis: interactive
                && self.offset == 0.0
                && !self.start_of_loop
                && !self.settling,
            interactive,
            tooltip: self.config().tooltip.then_some(self.config().text.as_str()),
        }
    }

    pub fn snapshot(&self) -> HintsSnapshot {
        let hints = self.render_hints();
        HintsSnapshot {
            offset: hints.offset,
            transition: hints.transition,
            ellipsis: hints.ellipsis,
            interactive: hints.interactive,
            phase: self.phase,
            tooltip: hints.tooltip.map(str::to_string),
        }
    }
}
