//! Informational bodies shown while the installer is busy: waiting for
//! machines, waiting for node installation, and a one-line step message.

use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::core::config::Config;
use crate::core::controller::Installer;
use crate::core::status::MachineWaitSummary;
use crate::tui::component::Component;
use crate::tui::palette;

/// Render `lines` centred both ways inside `area`.
fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        text_area,
    );
}

pub struct MachineWaitView {
    installer: Rc<dyn Installer>,
    release: Option<String>,
    summary: MachineWaitSummary,
}

impl MachineWaitView {
    pub fn new(installer: Rc<dyn Installer>, config: &Config) -> Self {
        let summary = installer.machine_wait();
        Self {
            installer,
            release: config.openstack_release.clone(),
            summary,
        }
    }

    /// Re-query the installer for machine availability.
    pub fn update(&mut self) {
        self.summary = self.installer.machine_wait();
    }

    pub fn summary(&self) -> &MachineWaitSummary {
        &self.summary
    }
}

impl Component for MachineWaitView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let release = self
            .release
            .as_deref()
            .map(|r| format!(" ({r})"))
            .unwrap_or_default();
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Waiting for machines{release}"),
                palette::heading(),
            )),
            Line::from(""),
            Line::from(format!(
                "The {} install needs at least {} machines; {} available.",
                self.installer.name(),
                self.summary.required,
                self.summary.machines.len()
            )),
            Line::from(""),
        ];
        for machine in &self.summary.machines {
            lines.push(Line::from(format!(
                "{}  {}  {}",
                machine.hostname,
                machine.status,
                machine.hardware.as_deref().unwrap_or("")
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Add or commission machines in MAAS. This screen refreshes automatically.",
            palette::dim(),
        )));

        render_centered(frame, area, lines);
    }
}

pub struct NodeInstallWaitView {
    message: String,
}

impl NodeInstallWaitView {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Component for NodeInstallWaitView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        render_centered(
            frame,
            area,
            vec![
                Line::from(Span::styled("Installing", palette::heading())),
                Line::from(""),
                Line::from(self.message.as_str()),
            ],
        );
    }
}

pub struct StepInfoView {
    message: String,
}

impl StepInfoView {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Component for StepInfoView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.message.lines().map(Line::from).collect();
        let block = Block::new().padding(Padding::horizontal(2));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_centered(frame, inner, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeInstaller;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(component: &mut dyn Component) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| component.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_machine_wait_counts() {
        let installer = Rc::new(FakeInstaller::new("Multi", 3));
        installer.add_machine("node-1");
        let config = Config {
            openstack_release: Some("kilo".to_string()),
            ..Default::default()
        };
        let mut view = MachineWaitView::new(installer.clone(), &config);
        let text = draw(&mut view);
        assert!(text.contains("Waiting for machines (kilo)"));
        assert!(text.contains("needs at least 3 machines; 1 available"));

        installer.add_machine("node-2");
        view.update();
        assert_eq!(view.summary().machines.len(), 2);
        assert!(draw(&mut view).contains("node-2"));
    }

    #[test]
    fn test_node_install_wait_message() {
        let mut view = NodeInstallWaitView::new("Bootstrapping Juju");
        assert!(draw(&mut view).contains("Bootstrapping Juju"));
        view.set_message("Deploying services");
        assert_eq!(view.message(), "Deploying services");
    }

    #[test]
    fn test_step_info_multiline() {
        let mut view = StepInfoView::new("Install type: Single\nRelease: kilo");
        let text = draw(&mut view);
        assert!(text.contains("Install type: Single"));
        assert!(text.contains("Release: kilo"));
    }
}
