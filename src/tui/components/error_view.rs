use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::components::centered_box;
use crate::tui::palette;

const ERROR_WIDTH: u16 = 70;

/// Terminal screen for a fatal error. Only (Q)uit is useful from here.
pub struct ErrorView {
    message: String,
}

impl ErrorView {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Component for ErrorView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = ERROR_WIDTH.min(area.width);
        // Rough wrap estimate, borders and padding included
        let text_rows = (self.message.chars().count() as u16 / width.saturating_sub(4).max(1)) + 1;
        let box_area = centered_box(width, text_rows + 7, area);

        let block = Block::bordered()
            .border_type(BorderType::Double)
            .border_style(palette::error())
            .title(" ERROR ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));

        let body = vec![
            Line::from(Span::styled("A fatal error has occurred.", palette::error())),
            Line::from(""),
            Line::from(self.message.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                "See ~/.cloud-install/commands.log for details. Press (Q) to quit.",
                palette::dim(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(body).block(block).wrap(Wrap { trim: true }),
            box_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_renders_message() {
        let backend = TestBackend::new(90, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut view = ErrorView::new("Juju bootstrap failed");

        terminal.draw(|f| view.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("ERROR"));
        assert!(text.contains("Juju bootstrap failed"));
    }
}
