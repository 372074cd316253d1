//! # SelectorWithDescription
//!
//! Single-choice list where each option carries a description. The
//! description of the highlighted option is shown beneath the list.
//! Enter picks, Esc aborts the installer.

use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_box;
use crate::tui::event::TuiEvent;
use crate::tui::event_loop::EventLoop;
use crate::tui::gui::{PegasusGui, SelectCallback};
use crate::tui::palette;

const SELECTOR_WIDTH: u16 = 72;
const DESCRIPTION_HEIGHT: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub name: String,
    pub description: String,
}

impl SelectorOption {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    Moved,
    Selected(String),
    Cancelled,
}

pub struct SelectorWithDescription {
    title: String,
    options: Vec<SelectorOption>,
    selected: usize,
    list_state: ListState,
    callback: SelectCallback,
    done: bool,
}

impl SelectorWithDescription {
    pub fn new(
        title: &str,
        options: Vec<SelectorOption>,
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &str) + 'static,
    ) -> Self {
        let mut list_state = ListState::default();
        if !options.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            title: title.to_string(),
            options,
            selected: 0,
            list_state,
            callback: Rc::new(cb),
            done: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected(&self) -> Option<&SelectorOption> {
        self.options.get(self.selected)
    }

    pub fn callback(&self) -> SelectCallback {
        self.callback.clone()
    }
}

impl EventHandler for SelectorWithDescription {
    type Event = SelectorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SelectorEvent> {
        if self.done {
            return None;
        }
        match event {
            TuiEvent::CursorUp if !self.options.is_empty() => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                Some(SelectorEvent::Moved)
            }
            TuiEvent::CursorDown if !self.options.is_empty() => {
                self.selected = (self.selected + 1).min(self.options.len() - 1);
                self.list_state.select(Some(self.selected));
                Some(SelectorEvent::Moved)
            }
            TuiEvent::Submit => {
                let choice = self.options.get(self.selected)?.name.clone();
                self.done = true;
                Some(SelectorEvent::Selected(choice))
            }
            TuiEvent::Escape => {
                self.done = true;
                Some(SelectorEvent::Cancelled)
            }
            _ => None,
        }
    }
}

impl Component for SelectorWithDescription {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let list_height = self.options.len() as u16;
        // title + list + gap + description + borders
        let height = 1 + list_height + 1 + DESCRIPTION_HEIGHT + 2;
        let overlay = centered_box(SELECTOR_WIDTH, height, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_style(palette::border())
            .title_bottom(Line::from(" ↑↓ Move  Enter Select  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [title_area, list_area, _, desc_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(list_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(self.title.as_str(), palette::heading()))
                .alignment(Alignment::Center),
            title_area,
        );

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|opt| ListItem::new(Line::from(format!("  {}", opt.name))))
            .collect();
        let list = List::new(items).highlight_style(palette::selected());
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        if let Some(opt) = self.options.get(self.selected) {
            frame.render_widget(
                Paragraph::new(opt.description.as_str())
                    .style(palette::dim())
                    .wrap(Wrap { trim: true }),
                desc_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn selector() -> SelectorWithDescription {
        SelectorWithDescription::new(
            "Pick one",
            vec![
                SelectorOption::new("Single", "Everything on this machine"),
                SelectorOption::new("Multi", "Deploy with MAAS"),
            ],
            |_, _, _| {},
        )
    }

    #[test]
    fn test_navigation_clamps() {
        let mut sel = selector();
        sel.handle_event(&TuiEvent::CursorUp);
        assert_eq!(sel.selected().unwrap().name, "Single");
        sel.handle_event(&TuiEvent::CursorDown);
        sel.handle_event(&TuiEvent::CursorDown);
        assert_eq!(sel.selected().unwrap().name, "Multi");
    }

    #[test]
    fn test_submit_returns_name_once() {
        let mut sel = selector();
        sel.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            sel.handle_event(&TuiEvent::Submit),
            Some(SelectorEvent::Selected("Multi".to_string()))
        );
        assert_eq!(sel.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_escape_cancels() {
        let mut sel = selector();
        assert_eq!(sel.handle_event(&TuiEvent::Escape), Some(SelectorEvent::Cancelled));
    }

    #[test]
    fn test_empty_submit_ignored() {
        let mut sel = SelectorWithDescription::new("Nothing", Vec::new(), |_, _, _| {});
        assert_eq!(sel.handle_event(&TuiEvent::Submit), None);
        assert_eq!(sel.handle_event(&TuiEvent::CursorDown), None);
    }

    #[test]
    fn test_render_shows_description_of_highlighted() {
        let backend = TestBackend::new(90, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut sel = selector();
        sel.handle_event(&TuiEvent::CursorDown);

        terminal.draw(|f| sel.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Pick one"));
        assert!(text.contains("Deploy with MAAS"));
        assert!(!text.contains("Everything on this machine"));
    }
}
