use marquee_core::{HoverMode, Phase};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let mode_str = match app.hover_mode() {
            HoverMode::HoverToStart => "HOVER-TO-START",
            HoverMode::HoverToStop => "HOVER-TO-STOP",
        };
        let loop_str = if app.template.looping { "loop" } else { "once" };

        let status_text = match app.hovered_row() {
            Some(row) => {
                let hints = row.marquee.render_hints();
                let row_text = format!(
                    " {} | {} | {} {:>3}/{}",
                    mode_str,
                    loop_str,
                    phase_str(row.marquee.phase()),
                    hints.offset as i64,
                    row.marquee.overflow_width().max(0.0) as i64,
                );
                match hints.tooltip {
                    Some(tooltip) => format!("{} | {}", row_text, tooltip),
                    None => row_text,
                }
            }
            None => format!(" {} | {}", mode_str, loop_str),
        };

        let help_hint = " q:quit j/k:hover h:mode l:loop t:tooltip r:restart ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.chars().count() + help_hint.len());

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(app.theme.fg).bg(app.theme.bg),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(app.theme.bg),
            ),
            Span::styled(
                help_hint,
                Style::default().fg(app.theme.dim).bg(app.theme.bg),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

fn phase_str(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Leading => "leading",
        Phase::Scrolling => "scrolling",
        Phase::TrailingPause => "trailing",
        Phase::LoopDelay => "loop-delay",
    }
}
