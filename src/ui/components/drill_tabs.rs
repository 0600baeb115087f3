use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::drill::{DrillKind, DrillSet};
use crate::ui::theme::Theme;

/// One-line tab bar: number key, English and Korean label, drill count.
pub struct DrillTabs<'a> {
    set: &'a DrillSet,
    active: DrillKind,
    theme: &'a Theme,
}

impl<'a> DrillTabs<'a> {
    pub fn new(set: &'a DrillSet, active: DrillKind, theme: &'a Theme) -> Self {
        Self { set, active, theme }
    }
}

impl Widget for DrillTabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let compact = area.width < 110;

        let mut spans = Vec::new();
        for kind in DrillKind::ALL {
            let label = if compact {
                format!(" {} {} ({}) ", kind.index() + 1, kind.korean_label(), self.set.count(kind))
            } else {
                format!(
                    " {} {} {} ({}) ",
                    kind.index() + 1,
                    kind.label(),
                    kind.korean_label(),
                    self.set.count(kind)
                )
            };
            let style = if kind == self.active {
                Style::default()
                    .fg(colors.tab_active_fg())
                    .bg(colors.tab_active_bg())
                    .add_modifier(Modifier::BOLD)
            } else if self.set.count(kind) == 0 {
                Style::default().fg(colors.text_dim())
            } else {
                Style::default().fg(colors.fg())
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(colors.bg()))
            .render(area, buf);
    }
}
