use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    OpenFile,
    PasteText,
    Sample,
    Settings,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::OpenFile,
        MenuAction::PasteText,
        MenuAction::Sample,
        MenuAction::Settings,
        MenuAction::Quit,
    ];

    pub fn key(self) -> char {
        match self {
            MenuAction::OpenFile => 'f',
            MenuAction::PasteText => 't',
            MenuAction::Sample => 's',
            MenuAction::Settings => 'c',
            MenuAction::Quit => 'q',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.key() == key)
    }

    pub fn label(self) -> String {
        match self {
            MenuAction::OpenFile => t!("menu.open_file").to_string(),
            MenuAction::PasteText => t!("menu.paste_text").to_string(),
            MenuAction::Sample => t!("menu.sample").to_string(),
            MenuAction::Settings => t!("menu.settings").to_string(),
            MenuAction::Quit => t!("menu.quit").to_string(),
        }
    }

    pub fn description(self) -> String {
        match self {
            MenuAction::OpenFile => t!("menu.open_file_desc").to_string(),
            MenuAction::PasteText => t!("menu.paste_text_desc").to_string(),
            MenuAction::Sample => t!("menu.sample_desc").to_string(),
            MenuAction::Settings => t!("menu.settings_desc").to_string(),
            MenuAction::Quit => t!("menu.quit_desc").to_string(),
        }
    }
}

pub struct Menu<'a> {
    pub selected: usize,
    pub api_key_set: bool,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            selected: 0,
            api_key_set: false,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::ALL.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = MenuAction::ALL.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        MenuAction::ALL[self.selected.min(MenuAction::ALL.len() - 1)]
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let key_status = if self.api_key_set {
            Span::styled(t!("menu.api_key_ready").to_string(), Style::default().fg(colors.success()))
        } else {
            Span::styled(t!("menu.api_key_missing").to_string(), Style::default().fg(colors.warning()))
        };
        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.title").to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.subtitle").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(key_status),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                MenuAction::ALL
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, action) in MenuAction::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{}] {}", action.key(), action.label());
            let desc_text = format!("     {}", action.description());

            let label_style = if is_selected {
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let lines = vec![
                Line::from(Span::styled(label_text, label_style)),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.text_dim()))),
            ];

            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }
    }
}
