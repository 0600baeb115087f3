use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::drill::{DrillKind, DrillSentence, ExpansionDrill, ResponseDrill, TransformationDrill};
use crate::session::answer::{AnswerState, Verdict};
use crate::ui::components::input_field::input_line;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// The drills answered by typing.
#[derive(Clone, Copy)]
pub enum AnswerDrill<'a> {
    Response(&'a ResponseDrill),
    Transformation(&'a TransformationDrill),
    Expansion(&'a ExpansionDrill),
}

impl AnswerDrill<'_> {
    fn kind(&self) -> DrillKind {
        match self {
            AnswerDrill::Response(_) => DrillKind::Response,
            AnswerDrill::Transformation(_) => DrillKind::Transformation,
            AnswerDrill::Expansion(_) => DrillKind::Expansion,
        }
    }

    fn sentence(&self) -> &DrillSentence {
        match self {
            AnswerDrill::Response(d) => &d.sentence,
            AnswerDrill::Transformation(d) => &d.sentence,
            AnswerDrill::Expansion(d) => &d.sentence,
        }
    }

    /// Model answer in English and Korean.
    fn answer(&self) -> (String, String) {
        match self {
            AnswerDrill::Response(d) => (d.sentence.text(), d.sentence.korean.clone()),
            AnswerDrill::Transformation(d) => (d.answer.clone(), d.answer_korean.clone()),
            AnswerDrill::Expansion(d) => (d.answer.clone(), d.answer_korean.clone()),
        }
    }
}

pub struct AnswerCard<'a> {
    drill: AnswerDrill<'a>,
    state: &'a AnswerState,
    input: Option<&'a LineInput>,
    position: (usize, usize),
    theme: &'a Theme,
}

impl<'a> AnswerCard<'a> {
    pub fn new(
        drill: AnswerDrill<'a>,
        state: &'a AnswerState,
        input: Option<&'a LineInput>,
        position: (usize, usize),
        theme: &'a Theme,
    ) -> Self {
        Self {
            drill,
            state,
            input,
            position,
            theme,
        }
    }
}

impl Widget for AnswerCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let kind = self.drill.kind();
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

        let dim = Style::default().fg(colors.text_dim());
        let label = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let english = Style::default().fg(colors.fg());
        let korean = Style::default().fg(colors.korean());

        let sentence = self.drill.sentence();
        let mut lines = Vec::new();
        if let Some(instruction) = &sentence.instruction {
            lines.push(Line::from(Span::styled(instruction.clone(), dim)));
        }
        if let Some(instruction) = &sentence.instruction_korean {
            lines.push(Line::from(Span::styled(instruction.clone(), dim)));
        }
        lines.push(Line::from(""));

        match self.drill {
            AnswerDrill::Response(d) => {
                lines.push(Line::from(Span::styled(t!("card.prompt").to_string(), label)));
                lines.push(Line::from(Span::styled(d.prompt.clone(), english)));
                lines.push(Line::from(Span::styled(d.prompt_korean.clone(), korean)));
            }
            AnswerDrill::Transformation(d) => {
                lines.push(Line::from(Span::styled(d.sentence.text(), english)));
                lines.push(Line::from(Span::styled(d.sentence.korean.clone(), korean)));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(t!("card.target_form").to_string(), label)));
                lines.push(Line::from(Span::styled(d.target_form.clone(), english)));
                lines.push(Line::from(Span::styled(d.target_form_korean.clone(), korean)));
            }
            AnswerDrill::Expansion(d) => {
                lines.push(Line::from(Span::styled(d.sentence.text(), english)));
                lines.push(Line::from(Span::styled(d.sentence.korean.clone(), korean)));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(t!("card.cue").to_string(), label)));
                lines.push(Line::from(Span::styled(format!("+ {}", d.expansion_cue), english)));
                lines.push(Line::from(Span::styled(d.expansion_cue_korean.clone(), korean)));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(t!("card.your_answer").to_string(), label)));
        match self.input {
            Some(input) => lines.push(input_line(input, self.theme)),
            None if !self.state.submitted.is_empty() => {
                lines.push(Line::from(Span::styled(self.state.submitted.clone(), english)));
            }
            None => lines.push(Line::from(Span::styled(t!("card.press_to_answer").to_string(), dim))),
        }

        match self.state.verdict {
            Some(Verdict::Correct) => lines.push(Line::from(Span::styled(
                format!("✓ {}", t!("card.correct")),
                Style::default().fg(colors.success()).add_modifier(Modifier::BOLD),
            ))),
            Some(Verdict::Incorrect) => lines.push(Line::from(Span::styled(
                format!("✗ {}", t!("card.incorrect")),
                Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
            ))),
            None => {}
        }

        if self.state.revealed {
            let (answer, answer_korean) = self.drill.answer();
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(t!("card.answer").to_string(), label)));
            lines.push(Line::from(Span::styled(answer, Style::default().fg(colors.success()))));
            lines.push(Line::from(Span::styled(answer_korean, korean)));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
