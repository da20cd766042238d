use marquee_core::RenderHints;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// One line of marquee text, shifted left by the hinted offset
pub struct MarqueeWidget<'a> {
    text: &'a str,
    hints: RenderHints<'a>,
    style: Style,
    transition_style: Option<Style>,
}

impl<'a> MarqueeWidget<'a> {
    pub fn new(text: &'a str, hints: RenderHints<'a>) -> Self {
        Self {
            text,
            hints,
            style: Style::default(),
            transition_style: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Style for frames that request a transition. A terminal cannot ease
    /// between offsets, so the hint is shown as emphasis instead.
    pub fn transition_style(mut self, style: Style) -> Self {
        self.transition_style = Some(style);
        self
    }
}

impl Widget for MarqueeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let style = match self.transition_style {
            Some(style) if self.hints.transition => style,
            _ => self.style,
        };
        let width = area.width as usize;
        let line = visible_text(self.text, self.hints.offset, width, self.hints.ellipsis);

        buf.set_style(area, style);
        buf.set_stringn(area.x, area.y, &line, width, style);
    }
}

/// The part of `text` visible through a `width`-cell window scrolled by `offset` cells.
///
/// A wide character cut by the left edge is blanked. With `ellipsis` set and
/// more text than fits, the last cell becomes `…`.
pub fn visible_text(text: &str, offset: f64, width: usize, ellipsis: bool) -> String {
    if width == 0 {
        return String::new();
    }

    let skip = if offset.is_finite() && offset > 0.0 {
        offset.floor() as usize
    } else {
        0
    };
    let truncated = ellipsis && text.width() > skip + width;
    let budget = if truncated { width - 1 } else { width };

    let mut out = String::with_capacity(width);
    let mut column = 0;
    let mut used = 0;

    for ch in text.chars() {
        let char_width = ch.width().unwrap_or(0);
        let start = column;
        column += char_width;

        if column <= skip {
            continue;
        }

        let shown = if start < skip { column - skip } else { char_width };
        if used + shown > budget {
            break;
        }
        if start < skip {
            out.extend(std::iter::repeat(' ').take(shown));
        } else {
            out.push(ch);
        }
        used += shown;
    }

    if truncated {
        out.push(ELLIPSIS);
    }
    out
}
