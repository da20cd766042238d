use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for the next event, waiting at most `timeout`
    pub fn next(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout.min(self.tick_rate))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse moved or clicked
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Timeout elapsed without input
    Tick,
}
