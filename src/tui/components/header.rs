//! # Header
//!
//! Two-row header: title bar, then the hotkey hints for the current mode.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::palette;

const DASHBOARD_TITLE: &str = "Ubuntu OpenStack Installer - Dashboard";
const INSTALL_TITLE: &str = "Ubuntu Openstack Installer - Software Installation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Post-install status dashboard
    Dashboard,
    /// Setup wizard
    Install,
}

pub struct Header {
    mode: HeaderMode,
    release: Option<String>,
    show_add_units: bool,
}

impl Header {
    pub fn dashboard() -> Self {
        Self::new(HeaderMode::Dashboard)
    }

    pub fn install() -> Self {
        Self::new(HeaderMode::Install)
    }

    fn new(mode: HeaderMode) -> Self {
        Self {
            mode,
            release: None,
            show_add_units: false,
        }
    }

    pub fn mode(&self) -> HeaderMode {
        self.mode
    }

    pub fn set_openstack_rel(&mut self, release: &str) {
        self.release = Some(release.to_string());
    }

    pub fn set_show_add_units_hotkey(&mut self, show: bool) {
        self.show_add_units = show;
    }

    pub fn show_add_units(&self) -> bool {
        self.show_add_units
    }

    pub fn height(&self) -> u16 {
        2
    }

    pub fn title(&self) -> String {
        let base = match self.mode {
            HeaderMode::Dashboard => DASHBOARD_TITLE,
            HeaderMode::Install => INSTALL_TITLE,
        };
        match &self.release {
            Some(release) => format!("{base} ({release})"),
            None => base.to_string(),
        }
    }

    pub fn hotkey_line(&self) -> String {
        match self.mode {
            HeaderMode::Install => "(Q)uit".to_string(),
            HeaderMode::Dashboard => {
                let add = if self.show_add_units { "(A)dd Services • " } else { "" };
                format!("{add}(S)tatus • (Q)uit • (R)efresh • (H)elp")
            }
        }
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [title_area, hotkey_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let title = Paragraph::new(Line::from(format!(" {}", self.title())))
            .style(palette::frame_header());
        let hotkeys = Paragraph::new(Line::from(format!(" {}", self.hotkey_line())))
            .style(palette::frame_subheader());

        frame.render_widget(title, title_area);
        frame.render_widget(hotkeys, hotkey_area);
    }
}
