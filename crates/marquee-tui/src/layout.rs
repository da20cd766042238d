//! Cell-based layout oracle: terminal cells stand in for pixels.

use marquee_core::LayoutOracle;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Measures the container as a laid-out [`Rect`] and content by display width
#[derive(Debug, Clone, Copy, Default)]
pub struct CellLayout;

impl LayoutOracle for CellLayout {
    type Container = Rect;
    type Content = str;

    fn container_width(&self, container: &Rect) -> Option<f64> {
        // A zero-area rect has not been laid out yet
        if container.area() == 0 {
            None
        } else {
            Some(container.width as f64)
        }
    }

    fn content_width(&self, content: &str) -> Option<f64> {
        Some(content.width() as f64)
    }
}
