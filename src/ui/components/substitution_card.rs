use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::drill::{DrillKind, SubstitutionDrill};
use crate::session::substitution::SubstitutionState;
use crate::ui::theme::Theme;

pub struct SubstitutionCard<'a> {
    drill: &'a SubstitutionDrill,
    state: &'a SubstitutionState,
    position: (usize, usize),
    theme: &'a Theme,
}

impl<'a> SubstitutionCard<'a> {
    pub fn new(
        drill: &'a SubstitutionDrill,
        state: &'a SubstitutionState,
        position: (usize, usize),
        theme: &'a Theme,
    ) -> Self {
        Self {
            drill,
            state,
            position,
            theme,
        }
    }
}

impl Widget for SubstitutionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let kind = DrillKind::Substitution;
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

        let sentence = &self.drill.sentence;
        let mut lines = Vec::new();
        if let Some(instruction) = &sentence.instruction {
            lines.push(Line::from(Span::styled(
                instruction.clone(),
                Style::default().fg(colors.text_dim()),
            )));
        }
        if let Some(instruction) = &sentence.instruction_korean {
            lines.push(Line::from(Span::styled(
                instruction.clone(),
                Style::default().fg(colors.text_dim()),
            )));
        }
        lines.push(Line::from(""));

        let focused = self.state.focused_position();
        let mut spans = Vec::new();
        for (i, word) in self.state.words.iter().enumerate() {
            if !word.is_interactive {
                spans.push(Span::styled(word.text.clone(), Style::default().fg(colors.fg())));
                continue;
            }
            let changed = sentence.english.get(i).is_some_and(|orig| orig.text != word.text);
            let mut style = Style::default()
                .fg(if changed { colors.substituted() } else { colors.interactive() })
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            if focused == Some(i) {
                style = style.fg(colors.focused_word_fg()).bg(colors.focused_word_bg());
            }
            // Highlight the word only, not its separator.
            let (core, separator) = word.text.split_at(word.text.trim_end().len());
            spans.push(Span::styled(core.to_string(), style));
            if !separator.is_empty() {
                spans.push(Span::styled(separator.to_string(), Style::default().fg(colors.fg())));
            }
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(
            sentence.korean.clone(),
            Style::default().fg(colors.korean()),
        )));
        lines.push(Line::from(""));

        let mut badges = vec![Span::styled(
            format!("{}: ", t!("card.roles")),
            Style::default().fg(colors.text_dim()),
        )];
        for word in self.drill.sentence.english.iter().filter(|w| w.is_interactive) {
            let role = word.word_type.map(|t| t.korean_label()).unwrap_or("");
            badges.push(Span::styled(
                format!("[{} · {role}]", word.core()),
                Style::default().fg(colors.accent()),
            ));
            badges.push(Span::raw(" "));
        }
        lines.push(Line::from(badges));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
