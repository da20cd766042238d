use std::time::{Duration, Instant};

use marquee_core::{AppConfig, HoverMode, Marquee, MarqueeConfig};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::input::Action;
use crate::layout::CellLayout;
use crate::theme::Theme;

/// One headline and the marquee animating it
#[derive(Debug)]
pub struct Row {
    pub marquee: Marquee,
    /// Where the text was last drawn; zero until the first draw
    pub area: Rect,
}

impl Row {
    pub fn text(&self) -> &str {
        &self.marquee.config().text
    }
}

/// Demo application state
pub struct App {
    pub rows: Vec<Row>,
    /// Row currently under the (mouse or keyboard) pointer
    pub hovered: Option<usize>,
    /// Configuration shared by every row apart from its text
    pub template: MarqueeConfig,
    pub theme: Theme,
    pub column_width: u16,
    pub should_quit: bool,
    epoch: Instant,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let template = config.marquee.clone();
        let rows = config
            .ui
            .headlines
            .iter()
            .map(|text| Row {
                marquee: Marquee::new(MarqueeConfig {
                    text: text.clone(),
                    ..template.clone()
                }),
                area: Rect::default(),
            })
            .collect();

        Self {
            rows,
            hovered: None,
            template,
            theme: Theme::from_overrides(&config.ui.colors),
            column_width: config.ui.column_width,
            should_quit: false,
            epoch: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Advance every marquee to the current wall-clock time
    pub fn tick(&mut self) {
        self.tick_at(self.elapsed());
    }

    pub fn tick_at(&mut self, now: Duration) {
        for row in &mut self.rows {
            row.marquee.advance_to(now);
        }
    }

    /// Re-sample widths after a draw
    pub fn measure_rows(&mut self) {
        for row in &mut self.rows {
            // Sample under a shared borrow of the row, then apply
            let widths =
                marquee_core::layout::sample(&CellLayout, Some(&row.area), Some(row.text()));
            if let Some(widths) = widths {
                row.marquee.apply_widths(widths);
            }
        }
    }

    /// How long the event loop may block before some marquee needs attention
    pub fn poll_timeout(&self, max: Duration) -> Duration {
        let now = self.elapsed();
        self.rows
            .iter()
            .filter_map(|row| row.marquee.next_deadline())
            .map(|deadline| deadline.saturating_sub(now))
            .fold(max, Duration::min)
    }

    pub fn hovered_row(&self) -> Option<&Row> {
        self.hovered.and_then(|index| self.rows.get(index))
    }

    pub fn hover_mode(&self) -> HoverMode {
        HoverMode::from(&self.template)
    }

    /// Move the pointer onto `index` (or off every row)
    pub fn hover(&mut self, index: Option<usize>) {
        if index == self.hovered {
            return;
        }
        if let Some(row) = self.hovered.and_then(|i| self.rows.get_mut(i)) {
            row.marquee.pointer_leave();
        }
        if let Some(row) = index.and_then(|i| self.rows.get_mut(i)) {
            row.marquee.pointer_enter();
        }
        debug!(from = ?self.hovered, to = ?index, "Hover moved");
        self.hovered = index;
    }

    pub fn on_mouse_move(&mut self, column: u16, line: u16) {
        let position = Position::new(column, line);
        let hit = self.rows.iter().position(|row| row.area.contains(position));
        self.hover(hit);
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveDown => {
                let next = match self.hovered {
                    Some(i) if i + 1 < self.rows.len() => i + 1,
                    Some(i) => i,
                    None => 0,
                };
                if !self.rows.is_empty() {
                    self.hover(Some(next));
                }
            }
            Action::MoveUp => {
                let prev = match self.hovered {
                    Some(i) => i.saturating_sub(1),
                    None => self.rows.len().saturating_sub(1),
                };
                if !self.rows.is_empty() {
                    self.hover(Some(prev));
                }
            }
            Action::Leave => self.hover(None),
            Action::ToggleLoop => {
                self.template.looping = !self.template.looping;
                self.reconfigure_all(false);
            }
            Action::ToggleHoverMode => {
                self.hover(None);
                self.template.hover_to_stop = !self.template.hover_to_stop;
                self.reconfigure_all(true);
            }
            Action::ToggleTooltip => {
                self.template.tooltip = !self.template.tooltip;
                self.reconfigure_all(false);
            }
            Action::Restart => {
                for row in &mut self.rows {
                    row.marquee.reset();
                }
            }
            Action::None => {}
        }
    }

    /// Push the template to every row; `restart` also returns each to its first frame
    fn reconfigure_all(&mut self, restart: bool) {
        for row in &mut self.rows {
            let config = MarqueeConfig {
                text: row.text().to_string(),
                ..self.template.clone()
            };
            row.marquee.reconfigure(config);
            if restart {
                row.marquee.reset();
            }
        }
    }

    /// Tear down every marquee before exit
    pub fn shutdown(&mut self) {
        self.hover(None);
        for row in &mut self.rows {
            row.marquee.teardown();
        }
    }
}
