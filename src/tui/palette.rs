//! Shared styles. The installer targets 256-colour terminals; indexed
//! colours below fall back to the nearest basic colour elsewhere.

use ratatui::style::{Color, Modifier, Style};

use crate::core::status::AgentState;

const ORANGE: Color = Color::Indexed(166);
const AUBERGINE: Color = Color::Indexed(53);
const WARM_GREY: Color = Color::Indexed(245);

pub fn frame_header() -> Style {
    Style::default().fg(Color::White).bg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn frame_subheader() -> Style {
    Style::default().fg(Color::White).bg(AUBERGINE)
}

pub fn frame_footer() -> Style {
    Style::default().fg(Color::White).bg(Color::Indexed(236))
}

pub fn heading() -> Style {
    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().fg(WARM_GREY)
}

pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn input() -> Style {
    Style::default().fg(Color::White).bg(Color::Indexed(238))
}

pub fn input_focus() -> Style {
    Style::default().fg(Color::Black).bg(Color::Indexed(252))
}

pub fn selected() -> Style {
    Style::default().fg(Color::White).bg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn button() -> Style {
    Style::default().fg(Color::White).bg(AUBERGINE)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn info() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn agent_state(state: AgentState) -> Style {
    match state {
        AgentState::Pending => dim(),
        AgentState::Installing => Style::default().fg(Color::Yellow),
        AgentState::Started => Style::default().fg(Color::Green),
        AgentState::Error => error(),
    }
}
