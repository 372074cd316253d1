//! # Banner
//!
//! Splash shown while the installer starts up.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::palette;

#[derive(Default)]
pub struct Banner;

impl Banner {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Banner {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled("Ubuntu OpenStack Installer", palette::heading())),
            Line::from(""),
            Line::from("By Canonical, Ltd."),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                palette::dim(),
            )),
        ];

        let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }
}
