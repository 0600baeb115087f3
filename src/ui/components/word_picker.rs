use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use rust_i18n::t;

use crate::drill::WordType;
use crate::ui::theme::Theme;

/// Alternatives offered for the focused word of a substitution drill.
pub struct WordPicker {
    pub choices: Vec<String>,
    pub selected: usize,
    pub word_type: Option<WordType>,
}

impl WordPicker {
    pub fn new(choices: Vec<String>, word_type: Option<WordType>) -> Self {
        Self {
            choices,
            selected: 0,
            word_type,
        }
    }

    pub fn next(&mut self) {
        if !self.choices.is_empty() {
            self.selected = (self.selected + 1) % self.choices.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.choices.is_empty() {
            self.selected = (self.selected + self.choices.len() - 1) % self.choices.len();
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.choices.get(self.selected).map(String::as_str)
    }
}

pub struct WordPickerView<'a> {
    picker: &'a WordPicker,
    theme: &'a Theme,
}

impl<'a> WordPickerView<'a> {
    pub fn new(picker: &'a WordPicker, theme: &'a Theme) -> Self {
        Self { picker, theme }
    }

    /// Rows needed to show every choice plus header and hint.
    pub fn height(&self) -> u16 {
        self.picker.choices.len() as u16 + 6
    }
}

impl Widget for WordPickerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(format!(" {} ", t!("picker.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        if let Some(word_type) = self.picker.word_type {
            lines.push(Line::from(Span::styled(
                format!("{} ({})", word_type.korean_label(), word_type.as_str()),
                Style::default().fg(colors.text_dim()),
            )));
            lines.push(Line::from(""));
        }
        for (i, choice) in self.picker.choices.iter().enumerate() {
            let selected = i == self.picker.selected;
            let style = if selected {
                Style::default()
                    .fg(colors.focused_word_fg())
                    .bg(colors.focused_word_bg())
                    .add_modifier(Modifier::BOLD)
            } else if i == 0 {
                Style::default().fg(colors.interactive())
            } else {
                Style::default().fg(colors.fg())
            };
            let marker = if selected { ">" } else { " " };
            lines.push(Line::from(Span::styled(format!("{marker} {choice}"), style)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            t!("picker.hint").to_string(),
            Style::default().fg(colors.text_dim()),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_cycles() {
        let mut picker = WordPicker::new(vec!["cat".into(), "dog".into()], Some(WordType::Subject));
        assert_eq!(picker.current(), Some("cat"));
        picker.next();
        assert_eq!(picker.current(), Some("dog"));
        picker.next();
        assert_eq!(picker.current(), Some("cat"));
        picker.prev();
        assert_eq!(picker.current(), Some("dog"));
    }

    #[test]
    fn test_empty_picker() {
        let mut picker = WordPicker::new(Vec::new(), None);
        picker.next();
        picker.prev();
        assert_eq!(picker.current(), None);
    }
}
