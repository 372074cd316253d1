//! # AddServicesDialog
//!
//! Checklist of services that can be added to a running cloud. Space
//! toggles, Enter queues the checked services and deploys, Esc cancels.
//! Either way the dialog is finished and will not be reused.

use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};

use crate::core::controller::{PlacementController, ServiceOption};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_box;
use crate::tui::event::TuiEvent;
use crate::tui::gui::UiAction;
use crate::tui::palette;

const DIALOG_WIDTH: u16 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxState {
    Unchecked,
    Checked,
}

impl CheckboxState {
    pub fn toggle(&mut self) {
        *self = match self {
            CheckboxState::Unchecked => CheckboxState::Checked,
            CheckboxState::Checked => CheckboxState::Unchecked,
        };
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, CheckboxState::Checked)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CheckboxState::Unchecked => "[ ]",
            CheckboxState::Checked => "[x]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddServicesEvent {
    Changed,
    Deploy,
    Cancel,
}

pub struct AddServicesDialog {
    controller: Rc<dyn PlacementController>,
    options: Vec<(ServiceOption, CheckboxState)>,
    list_state: ListState,
    deploy: UiAction,
    cancel: UiAction,
    finished: bool,
}

impl AddServicesDialog {
    pub fn new(controller: Rc<dyn PlacementController>, deploy: UiAction, cancel: UiAction) -> Self {
        let mut dialog = Self {
            controller,
            options: Vec::new(),
            list_state: ListState::default(),
            deploy,
            cancel,
            finished: false,
        };
        dialog.update();
        dialog
    }

    /// Reload the addable services, keeping check marks by service name.
    pub fn update(&mut self) {
        let previous = std::mem::take(&mut self.options);
        self.options = self
            .controller
            .addable_services()
            .into_iter()
            .map(|opt| {
                let state = previous
                    .iter()
                    .find(|(p, _)| p.name == opt.name)
                    .map_or(CheckboxState::Unchecked, |(_, s)| *s);
                (opt, state)
            })
            .collect();
        let selected = match (self.list_state.selected(), self.options.len()) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn checked(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|(_, state)| state.is_checked())
            .map(|(opt, _)| opt.name.as_str())
            .collect()
    }

    pub fn deploy_callback(&self) -> UiAction {
        self.deploy.clone()
    }

    pub fn cancel_callback(&self) -> UiAction {
        self.cancel.clone()
    }
}

impl EventHandler for AddServicesDialog {
    type Event = AddServicesEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<AddServicesEvent> {
        if self.finished {
            return None;
        }
        match event {
            TuiEvent::CursorUp if !self.options.is_empty() => {
                let i = self.list_state.selected().unwrap_or(0).saturating_sub(1);
                self.list_state.select(Some(i));
                Some(AddServicesEvent::Changed)
            }
            TuiEvent::CursorDown if !self.options.is_empty() => {
                let last = self.options.len() - 1;
                let i = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(i));
                Some(AddServicesEvent::Changed)
            }
            TuiEvent::InputChar(' ') => {
                let i = self.list_state.selected()?;
                let (_, state) = self.options.get_mut(i)?;
                state.toggle();
                Some(AddServicesEvent::Changed)
            }
            TuiEvent::Submit => {
                let checked: Vec<String> = self.checked().into_iter().map(String::from).collect();
                if checked.is_empty() {
                    return Some(AddServicesEvent::Changed);
                }
                for name in &checked {
                    self.controller.add_service(name);
                }
                self.finished = true;
                Some(AddServicesEvent::Deploy)
            }
            TuiEvent::Escape => {
                self.finished = true;
                Some(AddServicesEvent::Cancel)
            }
            _ => None,
        }
    }
}

impl Component for AddServicesDialog {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let list_height = self.options.len().max(1) as u16;
        // list + gap + description (2) + borders
        let overlay = centered_box(DIALOG_WIDTH, list_height + 5, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_style(palette::border())
            .title(" Add Services ")
            .title_bottom(Line::from(" Space Toggle  Enter Deploy  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [list_area, _, desc_area] = Layout::vertical([
            Constraint::Length(list_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        if self.options.is_empty() {
            frame.render_widget(
                Paragraph::new("No additional services available.").style(palette::dim()),
                list_area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|(opt, state)| ListItem::new(format!("{} {}", state.symbol(), opt.name)))
            .collect();
        frame.render_stateful_widget(
            List::new(items).highlight_style(palette::selected()),
            list_area,
            &mut self.list_state,
        );

        if let Some((opt, _)) = self.list_state.selected().and_then(|i| self.options.get(i)) {
            frame.render_widget(
                Paragraph::new(Span::styled(opt.description.as_str(), palette::dim()))
                    .wrap(Wrap { trim: true }),
                desc_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakePlacement, noop_action};

    fn dialog(pc: Rc<FakePlacement>) -> AddServicesDialog {
        AddServicesDialog::new(pc, noop_action(), noop_action())
    }

    #[test]
    fn test_checkbox_toggle() {
        let mut cb = CheckboxState::Unchecked;
        assert_eq!(cb.symbol(), "[ ]");
        cb.toggle();
        assert!(cb.is_checked());
        assert_eq!(cb.symbol(), "[x]");
    }

    #[test]
    fn test_submit_adds_checked_services() {
        let pc = Rc::new(FakePlacement::new());
        let mut dialog = dialog(pc.clone());
        dialog.handle_event(&TuiEvent::CursorDown);
        dialog.handle_event(&TuiEvent::InputChar(' '));

        assert_eq!(dialog.handle_event(&TuiEvent::Submit), Some(AddServicesEvent::Deploy));
        assert!(dialog.is_finished());
        assert_eq!(*pc.added.borrow(), vec!["nova-compute".to_string()]);
        assert_eq!(dialog.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_submit_with_nothing_checked_keeps_dialog_open() {
        let pc = Rc::new(FakePlacement::new());
        let mut dialog = dialog(pc.clone());
        assert_eq!(dialog.handle_event(&TuiEvent::Submit), Some(AddServicesEvent::Changed));
        assert!(!dialog.is_finished());
        assert!(pc.added.borrow().is_empty());
    }

    #[test]
    fn test_update_keeps_checks() {
        let pc = Rc::new(FakePlacement::new());
        let mut dialog = dialog(pc);
        dialog.handle_event(&TuiEvent::InputChar(' '));
        dialog.update();
        assert_eq!(dialog.checked(), vec!["swift"]);
    }

    #[test]
    fn test_escape_finishes_without_adding() {
        let pc = Rc::new(FakePlacement::new());
        let mut dialog = dialog(pc.clone());
        dialog.handle_event(&TuiEvent::InputChar(' '));
        assert_eq!(dialog.handle_event(&TuiEvent::Escape), Some(AddServicesEvent::Cancel));
        assert!(dialog.is_finished());
        assert!(pc.added.borrow().is_empty());
    }
}
