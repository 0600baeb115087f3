use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::drill::IntegrationDrill;
use crate::ui::theme::Theme;

pub struct IntegrationCard<'a> {
    drill: &'a IntegrationDrill,
    turn: usize,
    position: (usize, usize),
    theme: &'a Theme,
}

impl<'a> IntegrationCard<'a> {
    pub fn new(
        drill: &'a IntegrationDrill,
        turn: usize,
        position: (usize, usize),
        theme: &'a Theme,
    ) -> Self {
        Self {
            drill,
            turn,
            position,
            theme,
        }
    }
}

impl Widget for IntegrationCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let kind = self.drill.kind;
        let (current, total) = self.position;

        let block = Block::bordered()
            .title(format!(
                " {} {} · {} ",
                kind.label(),
                kind.korean_label(),
                t!("drills.position", current = current, total = total)
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let korean = Style::default().fg(colors.korean());
        let dim = Style::default().fg(colors.text_dim());

        let mut lines = vec![
            Line::from(Span::styled(t!("card.context").to_string(), label)),
            Line::from(Span::styled(self.drill.context.clone(), Style::default().fg(colors.fg()))),
            Line::from(Span::styled(self.drill.context_korean.clone(), korean)),
            Line::from(""),
            Line::from(Span::styled(self.drill.instruction.clone(), dim)),
            Line::from(Span::styled(self.drill.instruction_korean.clone(), dim)),
            Line::from(""),
        ];

        for (i, sentence) in self.drill.sentences.iter().enumerate() {
            let selected = i == self.turn;
            let marker = if selected { ">" } else { " " };
            let speaker = if i % 2 == 0 { 'A' } else { 'B' };
            let style = if selected {
                Style::default().fg(colors.focused_word_fg()).bg(colors.focused_word_bg())
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} {}. {speaker}: ", i + 1), dim),
                Span::styled(sentence.text(), style),
            ]));
            lines.push(Line::from(Span::styled(format!("       {}", sentence.korean), korean)));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
