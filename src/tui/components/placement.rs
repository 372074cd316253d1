//! # PlacementView
//!
//! Machine-to-service assignments on the left, required services still
//! waiting for a machine on the right. Enter (or `d`) deploys once every
//! required service has a home.

use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Padding, Paragraph};

use crate::core::config::Config;
use crate::core::controller::{Assignment, PlacementController};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::gui::UiAction;
use crate::tui::palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementEvent {
    Moved,
    Deploy,
    /// Deploy requested while these services are still unplaced
    Blocked(Vec<String>),
}

pub struct PlacementView {
    controller: Rc<dyn PlacementController>,
    title: String,
    assignments: Vec<Assignment>,
    unplaced: Vec<String>,
    list_state: ListState,
    deploy: UiAction,
}

impl PlacementView {
    pub fn new(controller: Rc<dyn PlacementController>, config: &Config, deploy: UiAction) -> Self {
        let title = match &config.openstack_release {
            Some(release) => format!(" Machine Placement ({release}) "),
            None => " Machine Placement ".to_string(),
        };
        let mut view = Self {
            controller,
            title,
            assignments: Vec::new(),
            unplaced: Vec::new(),
            list_state: ListState::default(),
            deploy,
        };
        view.update();
        view
    }

    /// Reload assignments from the placement controller.
    pub fn update(&mut self) {
        self.assignments = self.controller.assignments();
        self.unplaced = self.controller.unplaced_services();
        let selected = match (self.list_state.selected(), self.assignments.len()) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn unplaced(&self) -> &[String] {
        &self.unplaced
    }

    pub fn set_deploy_callback(&mut self, deploy: UiAction) {
        self.deploy = deploy;
    }

    pub fn deploy_callback(&self) -> UiAction {
        self.deploy.clone()
    }
}

impl EventHandler for PlacementView {
    type Event = PlacementEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PlacementEvent> {
        match event {
            TuiEvent::CursorUp if !self.assignments.is_empty() => {
                let i = self.list_state.selected().unwrap_or(0).saturating_sub(1);
                self.list_state.select(Some(i));
                Some(PlacementEvent::Moved)
            }
            TuiEvent::CursorDown if !self.assignments.is_empty() => {
                let last = self.assignments.len() - 1;
                let i = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(i));
                Some(PlacementEvent::Moved)
            }
            TuiEvent::Submit | TuiEvent::InputChar('d') | TuiEvent::InputChar('D') => {
                if self.controller.can_deploy() {
                    Some(PlacementEvent::Deploy)
                } else {
                    Some(PlacementEvent::Blocked(self.controller.unplaced_services()))
                }
            }
            _ => None,
        }
    }
}

impl Component for PlacementView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [machines_area, unplaced_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(area);

        let items: Vec<ListItem> = self
            .assignments
            .iter()
            .map(|a| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<16}", a.machine), palette::heading()),
                    Span::raw(a.services.join(", ")),
                ]))
            })
            .collect();
        let machines = List::new(items)
            .block(
                Block::bordered()
                    .border_style(palette::border())
                    .title(self.title.as_str())
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(palette::selected());
        frame.render_stateful_widget(machines, machines_area, &mut self.list_state);

        let mut lines: Vec<Line> = if self.unplaced.is_empty() {
            vec![Line::from(Span::styled("All required services are placed.", palette::info()))]
        } else {
            self.unplaced
                .iter()
                .map(|s| Line::from(Span::styled(format!("• {s}"), palette::error())))
                .collect()
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("(Enter) Deploy", palette::dim())));
        let unplaced = Paragraph::new(lines).block(
            Block::bordered()
                .border_style(palette::border())
                .title(" Unplaced Services ")
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(unplaced, unplaced_area);
    }
}
