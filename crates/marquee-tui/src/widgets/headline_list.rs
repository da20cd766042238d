use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::widgets::MarqueeWidget;

pub struct HeadlineListWidget;

impl HeadlineListWidget {
    /// Draw every row and record where its text landed, for hit testing and measuring
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let width = (app.column_width.saturating_add(2)).min(area.width);
        let area = Rect { width, ..area };

        let block = Block::default()
            .title(" Headlines ")
            .borders(Borders::ALL)
            .border_style(app.theme.border())
            .style(Style::default().bg(app.theme.bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let theme = app.theme.clone();
        for (i, row) in app.rows.iter_mut().enumerate() {
            let line = inner.y + i as u16;
            if line >= inner.bottom() || inner.width < 3 {
                row.area = Rect::default();
                continue;
            }

            let is_hovered = app.hovered == Some(i);
            let marker = if is_hovered { "▸ " } else { "  " };
            frame.render_widget(
                Span::styled(marker, theme.hovered()),
                Rect::new(inner.x, line, 2, 1),
            );

            row.area = Rect::new(inner.x + 2, line, inner.width - 2, 1);
            let hints = row.marquee.render_hints();
            let style = if is_hovered { theme.hovered() } else { theme.text() };
            frame.render_widget(
                MarqueeWidget::new(&row.marquee.config().text, hints)
                    .style(style)
                    .transition_style(theme.transition()),
                row.area,
            );
        }
    }
}
