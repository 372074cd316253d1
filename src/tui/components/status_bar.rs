//! # StatusBar
//!
//! One-row footer. Left: timestamped status message. Right: charms still
//! waiting to be deployed.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Normal,
    Info,
    Error,
}

#[derive(Default)]
pub struct StatusBar {
    message: String,
    level: StatusLevel,
    pending_deploys: Vec<String>,
    updated_at: Option<DateTime<Local>>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> StatusLevel {
        self.level
    }

    fn set(&mut self, message: String, level: StatusLevel) {
        self.message = message;
        self.level = level;
        self.updated_at = Some(Local::now());
    }

    pub fn show(&mut self, text: &str) {
        self.set(text.to_string(), StatusLevel::Normal);
    }

    pub fn show_error(&mut self, text: &str) {
        self.set(text.to_string(), StatusLevel::Error);
    }

    /// Informational messages describe work in progress and end with an ellipsis.
    pub fn show_info(&mut self, text: &str) {
        self.set(format!("{text}…"), StatusLevel::Info);
    }

    pub fn set_pending_deploys(&mut self, pending: Vec<String>) {
        self.pending_deploys = pending;
    }

    pub fn pending_deploys_line(&self) -> Option<String> {
        if self.pending_deploys.is_empty() {
            None
        } else {
            Some(format!("Pending deploys: {}", self.pending_deploys.join(", ")))
        }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let pending = self.pending_deploys_line().unwrap_or_default();
        let pending_width = (pending.chars().count() as u16 + 1).min(area.width / 2);
        let [message_area, pending_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(pending_width)])
                .areas(area);

        let style = match self.level {
            StatusLevel::Normal => palette::frame_footer(),
            StatusLevel::Info => palette::frame_footer().patch(palette::info()),
            StatusLevel::Error => palette::frame_footer().patch(palette::error()),
        };
        let mut spans = Vec::new();
        if let Some(at) = self.updated_at {
            spans.push(Span::raw(format!(" [{}] ", at.format("%H:%M:%S"))));
        }
        spans.push(Span::styled(self.message.as_str(), style));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(palette::frame_footer()),
            message_area,
        );
        frame.render_widget(
            Paragraph::new(pending)
                .alignment(Alignment::Right)
                .style(palette::frame_footer()),
            pending_area,
        );
    }
}
