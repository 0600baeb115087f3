use std::time::{Duration, Instant};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_DURATION
    }
}

pub struct ToastView<'a> {
    toast: &'a Toast,
    theme: &'a Theme,
}

impl<'a> ToastView<'a> {
    pub fn new(toast: &'a Toast, theme: &'a Theme) -> Self {
        Self { toast, theme }
    }

    /// Bottom-right corner of `area`, sized to the message.
    pub fn area(&self, area: Rect) -> Rect {
        let width = (self.toast.message.chars().count() as u16 + 4)
            .clamp(20, 60)
            .min(area.width);
        let text_width = width.saturating_sub(2).max(1) as usize;
        let lines = self.toast.message.chars().count().div_ceil(text_width).max(1) as u16;
        let height = (lines + 2).min(area.height);
        Rect::new(
            area.x + area.width - width,
            area.y + area.height.saturating_sub(height + 2),
            width,
            height,
        )
    }
}

impl Widget for ToastView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let color = match self.toast.kind {
            ToastKind::Success => colors.success(),
            ToastKind::Error => colors.error(),
        };
        Clear.render(area, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(Line::from(Span::styled(
            self.toast.message.clone(),
            Style::default().fg(colors.fg()),
        )))
        .wrap(Wrap { trim: true })
        .render(inner, buf);
    }
}
