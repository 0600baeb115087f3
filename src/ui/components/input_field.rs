use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Text of `input` with the cursor cell highlighted.
pub fn input_line(input: &LineInput, theme: &Theme) -> Line<'static> {
    let colors = &theme.colors;
    let (before, cursor_char, after) = input.render_parts();
    let cursor_style = Style::default()
        .fg(colors.input_cursor_fg())
        .bg(colors.input_cursor_bg());
    Line::from(vec![
        Span::styled(before, Style::default().fg(colors.fg())),
        Span::styled(cursor_char.unwrap_or(' ').to_string(), cursor_style),
        Span::styled(after, Style::default().fg(colors.fg())),
    ])
}

/// Bordered single-line input with a hint underneath.
pub struct InputField<'a> {
    title: String,
    input: &'a LineInput,
    hint: String,
    error: Option<String>,
    theme: &'a Theme,
}

impl<'a> InputField<'a> {
    pub fn new(title: String, input: &'a LineInput, hint: String, theme: &'a Theme) -> Self {
        Self {
            title,
            input,
            hint,
            error: None,
            theme,
        }
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for InputField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![input_line(self.input, self.theme), Line::from("")];
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(error, Style::default().fg(colors.error()))));
        }
        lines.push(Line::from(Span::styled(
            self.hint,
            Style::default().fg(colors.text_dim()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
