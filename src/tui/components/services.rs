//! # ServicesView
//!
//! Dashboard table: one group of rows per service, one row per unit.
//! Units carrying extra info (provisioning errors, unmet constraints) get
//! an indented detail row underneath.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use crate::core::status::ServiceNode;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette;

pub struct ServicesView {
    nodes: Vec<ServiceNode>,
    table_state: TableState,
}

impl ServicesView {
    pub fn new(nodes: Vec<ServiceNode>) -> Self {
        Self {
            nodes,
            table_state: TableState::default(),
        }
    }

    pub fn nodes(&self) -> &[ServiceNode] {
        &self.nodes
    }

    /// Swap in fresh service data, keeping the selection where possible.
    pub fn refresh_nodes(&mut self, nodes: Vec<ServiceNode>) {
        self.nodes = nodes;
        let rows = self.row_count();
        if let Some(selected) = self.table_state.selected() {
            self.table_state
                .select(if rows == 0 { None } else { Some(selected.min(rows - 1)) });
        }
    }

    /// One row per node, per unit, and per unit info line.
    fn row_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| {
                1 + node
                    .units
                    .iter()
                    .map(|unit| 1 + usize::from(unit.info.is_some()))
                    .sum::<usize>()
            })
            .sum()
    }

    fn rows(&self) -> Vec<Row<'static>> {
        let mut rows = Vec::new();
        for node in &self.nodes {
            rows.push(Row::new(vec![
                Cell::from(""),
                Cell::from(Span::styled(
                    node.name.clone(),
                    palette::heading().add_modifier(Modifier::UNDERLINED),
                )),
            ]));
            for unit in &node.units {
                let state = palette::agent_state(unit.agent_state);
                rows.push(Row::new(vec![
                    Cell::from(Span::styled(unit.agent_state.icon(), state)),
                    Cell::from(format!("  {}", unit.name)),
                    Cell::from(Span::styled(unit.agent_state.label(), state)),
                    Cell::from(unit.public_address.clone().unwrap_or_default()),
                    Cell::from(unit.machine.clone().unwrap_or_default()),
                    Cell::from(unit.hardware.clone().unwrap_or_default()),
                ]));
                if let Some(info) = &unit.info {
                    rows.push(Row::new(vec![
                        Cell::from(""),
                        Cell::from(Span::styled(format!("    {info}"), palette::info())),
                    ]));
                }
            }
        }
        rows
    }
}

impl Component for ServicesView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.nodes.is_empty() {
            let waiting = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Services", palette::heading())),
                Line::from(""),
                Line::from(Span::styled("No services deployed yet.", palette::dim())),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(waiting, area);
            return;
        }

        let header = Row::new(vec!["", "Services", "State", "Address", "Machine", "Hardware"])
            .style(palette::heading());
        let widths = [
            Constraint::Length(2),
            Constraint::Min(24),
            Constraint::Length(11),
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Min(16),
        ];
        let table = Table::new(self.rows(), widths)
            .header(header)
            .row_highlight_style(palette::selected());
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

impl EventHandler for ServicesView {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        let rows = self.row_count();
        if rows == 0 {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                let current = self.table_state.selected().unwrap_or(0);
                self.table_state.select(Some(current.saturating_sub(1)));
                Some(())
            }
            TuiEvent::CursorDown => {
                let next = self.table_state.selected().map_or(0, |i| (i + 1).min(rows - 1));
                self.table_state.select(Some(next));
                Some(())
            }
            _ => None,
        }
    }
}
