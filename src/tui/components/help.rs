//! # HelpView
//!
//! Static, scrollable reference text: hotkeys, screen layout, actions, and
//! where to look when something goes wrong. Content is wrapped to at most
//! 79 columns and centred.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette;

const MAX_WIDTH: u16 = 79;

enum Section {
    Title(&'static str),
    Heading(&'static str),
    Text(&'static str),
    Gap,
}

const HELP: &[Section] = &[
    Section::Gap,
    Section::Title("OpenStack Installer - Help ⇅ Scroll (S) To go back to Status screen"),
    Section::Gap,
    Section::Text("For full documentation, please refer to https://help.ubuntu.com/lts/clouddocs/installer/"),
    Section::Gap,
    Section::Text("Bug reports can be filed at http://git.io/p7IF"),
    Section::Gap,
    Section::Heading("Command Reference"),
    Section::Text("- Keyboard Shortcuts"),
    Section::Gap,
    Section::Text("  'A'   Add additional services to your cloud"),
    Section::Text("  'S'   Shows the status view"),
    Section::Text("  'Q'   Quit the application"),
    Section::Text("  'R'   Refreshes current view"),
    Section::Text("  'H'   Shows this help"),
    Section::Gap,
    Section::Heading("Overview"),
    Section::Text("- Layout"),
    Section::Gap,
    Section::Text("  - Header"),
    Section::Text("    The header lists the common command keys for quick reference."),
    Section::Gap,
    Section::Text("  - Main Table"),
    Section::Text("    One row per Juju service in the environment, refreshed every ten seconds. Each row shows a status icon, agent state, IP address, machine and hardware."),
    Section::Text("    An extra line appears under a service when provisioning fails or a unit reports additional status."),
    Section::Gap,
    Section::Text("  - Footer"),
    Section::Text("    The footer shows the latest status message and any pending deploys."),
    Section::Gap,
    Section::Heading("Actions"),
    Section::Text("- Adding Services"),
    Section::Text("  (A) opens a dialog for adding units, such as more compute nodes or a storage service. Required dependencies are launched too: adding swift also adds swift-proxy and enough swift-storage nodes to meet the replica count (currently 3)."),
    Section::Gap,
    Section::Heading("Troubleshooting"),
    Section::Text("The installation log can be found at:"),
    Section::Text("  ~/.cloud-install/commands.log"),
    Section::Gap,
    Section::Text("Note: in a multi-install MAAS may not find machines matching the default constraints of a service. The table shows this under the service's heading, with the constraints that could not be met."),
];

#[derive(Default)]
pub struct HelpView {
    scroll_state: ScrollViewState,
    content_height: u16,
    viewport_height: u16,
}

impl HelpView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Wrapped help lines for a given content width.
    pub fn lines(width: u16) -> Vec<Line<'static>> {
        let width = width.max(1) as usize;
        let rule = "─".repeat(width);
        let mut lines = Vec::new();
        for block in HELP {
            match block {
                Section::Gap => lines.push(Line::from("")),
                Section::Title(text) => {
                    lines.extend(textwrap::wrap(text, width).into_iter().map(|l| {
                        Line::from(Span::styled(l.into_owned(), palette::heading())).centered()
                    }));
                    lines.push(Line::from(Span::styled(rule.clone(), palette::dim())));
                }
                Section::Heading(text) => {
                    lines.push(Line::from(Span::styled(*text, palette::heading())));
                    lines.push(Line::from(Span::styled(rule.clone(), palette::dim())));
                    lines.push(Line::from(""));
                }
                Section::Text(text) => {
                    let indent: String = text.chars().take_while(|c| *c == ' ').collect();
                    let options = textwrap::Options::new(width)
                        .subsequent_indent(&indent)
                        .break_words(true);
                    lines.extend(
                        textwrap::wrap(text, options)
                            .into_iter()
                            .map(|l| Line::from(l.into_owned())),
                    );
                }
            }
        }
        lines
    }

    fn clamp_scroll(&mut self) {
        let max = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max {
            self.scroll_state.set_offset(Position { x: current.x, y: max });
        }
    }
}

impl Component for HelpView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(MAX_WIDTH);
        let column = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };
        // -1 for the scrollbar
        let content_width = width.saturating_sub(1);
        let lines = Self::lines(content_width);
        self.content_height = lines.len() as u16;
        self.viewport_height = area.height;
        self.clamp_scroll();

        let mut scroll_view = ScrollView::new(Size::new(content_width, self.content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, self.content_height),
        );
        frame.render_stateful_widget(scroll_view, column, &mut self.scroll_state);
    }
}

impl EventHandler for HelpView {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
            }
            TuiEvent::PageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
            }
            TuiEvent::CursorHome => self.scroll_state.scroll_to_top(),
            TuiEvent::CursorEnd => {
                self.scroll_state.scroll_to_bottom();
                self.clamp_scroll();
            }
            _ => return None,
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(view: &mut HelpView, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_lines_fit_width() {
        for line in HelpView::lines(40) {
            assert!(line.width() <= 40, "line too wide: {line:?}");
        }
    }

    #[test]
    fn test_top_shows_title() {
        let mut view = HelpView::new();
        let text = draw(&mut view, 100, 20);
        assert!(text.contains("OpenStack Installer - Help"));
        assert!(!text.contains("commands.log"));
    }

    #[test]
    fn test_scroll_to_end_reveals_log_path() {
        let mut view = HelpView::new();
        draw(&mut view, 100, 20);
        view.handle_event(&TuiEvent::CursorEnd);
        let text = draw(&mut view, 100, 20);
        assert!(text.contains("commands.log"));
    }

    #[test]
    fn test_scroll_clamped_at_bottom() {
        let mut view = HelpView::new();
        draw(&mut view, 100, 20);
        for _ in 0..500 {
            view.handle_event(&TuiEvent::CursorDown);
        }
        let max = view.content_height - view.viewport_height;
        assert_eq!(view.scroll_offset(), max);
    }

    #[test]
    fn test_other_keys_bubble() {
        let mut view = HelpView::new();
        assert_eq!(view.handle_event(&TuiEvent::InputChar('q')), None);
    }
}
