use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::drill::DrillKind;
use crate::session::PracticeSession;
use crate::session::answer::Verdict;
use crate::ui::theme::Theme;

/// Sidebar listing the drills of the current tab.
pub struct DrillList<'a> {
    session: &'a PracticeSession,
    theme: &'a Theme,
}

impl<'a> DrillList<'a> {
    pub fn new(session: &'a PracticeSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn entries(&self) -> Vec<(String, Option<Verdict>)> {
        let set = self.session.set();
        match self.session.tab() {
            DrillKind::Substitution => self
                .session
                .substitutions
                .iter()
                .map(|s| (s.text(), None))
                .collect(),
            DrillKind::Response => set
                .response
                .iter()
                .zip(&self.session.responses)
                .map(|(d, s)| (d.prompt.clone(), s.verdict))
                .collect(),
            DrillKind::Transformation => set
                .transformation
                .iter()
                .zip(&self.session.transformations)
                .map(|(d, s)| (d.sentence.text(), s.verdict))
                .collect(),
            DrillKind::Expansion => set
                .expansion
                .iter()
                .zip(&self.session.expansions)
                .map(|(d, s)| (d.sentence.text(), s.verdict))
                .collect(),
            DrillKind::Integration => set
                .integration
                .iter()
                .map(|d| (d.context.clone(), None))
                .collect(),
        }
    }
}

impl Widget for DrillList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("drills.list")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width.saturating_sub(5) as usize;
        let selected = self.session.selected();
        let lines: Vec<Line> = self
            .entries()
            .into_iter()
            .enumerate()
            .map(|(i, (text, verdict))| {
                let mark = match verdict {
                    Some(Verdict::Correct) => Span::styled("✓ ", Style::default().fg(colors.success())),
                    Some(Verdict::Incorrect) => Span::styled("✗ ", Style::default().fg(colors.error())),
                    None => Span::raw("  "),
                };
                let mut label: String = text.chars().take(width).collect();
                if text.chars().count() > width {
                    label.pop();
                    label.push('…');
                }
                let style = if i == selected {
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                let marker = if i == selected { ">" } else { " " };
                Line::from(vec![Span::styled(format!("{marker} "), style), mark, Span::styled(label, style)])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
