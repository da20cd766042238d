//! Pointer interaction: hover-to-start (default) and hover-to-stop.

use std::time::Duration;

use tracing::debug;

use crate::config::MarqueeConfig;
use crate::machine::Marquee;

/// How long the eased return to the start is flagged after the pointer leaves
pub const SETTLE_DURATION: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverMode {
    /// Stationary until hovered; leaving snaps (eased) back to the start
    HoverToStart,
    /// Scrolls by default; hovering freezes in place
    HoverToStop,
}

impl From<&MarqueeConfig> for HoverMode {
    fn from(config: &MarqueeConfig) -> Self {
        if config.hover_to_stop {
            HoverMode::HoverToStop
        } else {
            HoverMode::HoverToStart
        }
    }
}

impl Marquee {
    pub fn hover_mode(&self) -> HoverMode {
        HoverMode::from(self.config())
    }

    /// Pointer entered the container. Ignored when nothing overflows.
    pub fn pointer_enter(&mut self) {
        if !self.is_overflowing() {
            return;
        }
        self.hover_active = true;

        match self.hover_mode() {
            HoverMode::HoverToStop => {
                debug!(offset = self.offset, "Pointer entered, freezing marquee");
                self.stop();
            }
            HoverMode::HoverToStart => {
                // A pending settle from the previous hover must not fire into this one
                self.pending.cancel_settle();
                self.settling = false;
                if !self.is_running() {
                    self.start();
                }
            }
        }
    }

    /// Pointer left the container. Ignored when nothing overflows.
    pub fn pointer_leave(&mut self) {
        if !self.is_overflowing() {
            return;
        }
        self.hover_active = false;

        match self.hover_mode() {
            HoverMode::HoverToStop => self.start(),
            HoverMode::HoverToStart => {
                self.stop();
                // The settle flag carries the eased transition, so the reset itself is immediate
                self.offset = 0.0;
                self.settling = true;
                self.pending.schedule_settle(self.now, SETTLE_DURATION);
                debug!("Pointer left, settling back to start");
            }
        }
    }

    pub(crate) fn finish_settle(&mut self) {
        self.settling = false;
    }
}
