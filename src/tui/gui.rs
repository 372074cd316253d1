//! # PegasusGui
//!
//! Top-level view container: header, swappable body, optional footer.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Header (title + hotkeys)     │
//! ├──────────────────────────────┤
//! │ Body (exactly one ViewKind)  │
//! ├──────────────────────────────┤
//! │ Footer (status bar)          │
//! └──────────────────────────────┘
//! ```
//!
//! The controller switches the body with one `render_*`/`show_*` call per
//! screen. Heavier views (`ViewKind::is_cached`) are parked when switched
//! away from and brought back on the next call, then refreshed with
//! `update()`.

use log::{debug, error};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::config::Config;
use crate::core::controller::{Controller, PlacementController};
use crate::core::status::{ServiceNode, phase_status_line};
use crate::core::view::ViewKind;
use crate::core::wizard::InstallType;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{
    AddServicesDialog, AddServicesEvent, Banner, Dialog, DialogEvent, DialogValues, ErrorView,
    Header, HelpView, MachineWaitView, NodeInstallWaitView, PlacementEvent, PlacementView,
    SelectorEvent, SelectorOption, SelectorWithDescription, ServicesView, StatusBar, StepInfoView,
    landscape_input, maas_server_input, password_input,
};
use crate::tui::event::TuiEvent;
use crate::tui::event_loop::{CANCEL_MESSAGE, EventLoop};

/// Callback fired by a view action (deploy, cancel). May fire more than once
/// for cached views, hence `Fn` behind an `Rc`.
pub type UiAction = Rc<dyn Fn(&mut EventLoop, &mut PegasusGui)>;

/// Completion callback of a [`Dialog`].
pub type DialogCallback = Rc<dyn Fn(&mut EventLoop, &mut PegasusGui, &DialogValues)>;

/// Completion callback of a [`SelectorWithDescription`].
pub type SelectCallback = Rc<dyn Fn(&mut EventLoop, &mut PegasusGui, &str)>;

pub const INSTALL_TYPE_PROMPT: &str = "Select the type of installation to perform";

/// The widget currently filling the body region.
pub enum Body {
    Banner(Banner),
    Services(ServicesView),
    MachineWait(MachineWaitView),
    NodeInstallWait(NodeInstallWaitView),
    Help(HelpView),
    StepInfo(StepInfoView),
    Placement(PlacementView),
    AddServices(AddServicesDialog),
    Error(ErrorView),
    Selector(SelectorWithDescription),
    Dialog(Dialog),
}

impl Body {
    pub fn kind(&self) -> ViewKind {
        match self {
            Body::Banner(_) => ViewKind::Banner,
            Body::Services(_) => ViewKind::Services,
            Body::MachineWait(_) => ViewKind::MachineWait,
            Body::NodeInstallWait(_) => ViewKind::NodeInstallWait,
            Body::Help(_) => ViewKind::Help,
            Body::StepInfo(_) => ViewKind::StepInfo,
            Body::Placement(_) => ViewKind::Placement,
            Body::AddServices(_) => ViewKind::AddServicesDialog,
            Body::Error(_) => ViewKind::Error,
            Body::Selector(_) => ViewKind::Selector,
            Body::Dialog(dialog) => dialog.kind(),
        }
    }

    /// A finished add-services dialog must be rebuilt, not reused.
    fn is_reusable(&self) -> bool {
        match self {
            Body::AddServices(dialog) => !dialog.is_finished(),
            _ => true,
        }
    }

    fn component(&mut self) -> &mut dyn Component {
        match self {
            Body::Banner(view) => view,
            Body::Services(view) => view,
            Body::MachineWait(view) => view,
            Body::NodeInstallWait(view) => view,
            Body::Help(view) => view,
            Body::StepInfo(view) => view,
            Body::Placement(view) => view,
            Body::AddServices(view) => view,
            Body::Error(view) => view,
            Body::Selector(view) => view,
            Body::Dialog(view) => view,
        }
    }
}

/// What a keypress asked the GUI to do once the body borrow is released.
enum Outcome {
    Unhandled,
    Consumed,
    Submit(DialogCallback, DialogValues),
    Select(SelectCallback, String),
    Action(UiAction),
    StatusError(String),
    Abort,
}

pub struct PegasusGui {
    header: Header,
    body: Body,
    footer: Option<StatusBar>,
    /// Cached views not currently shown
    parked: HashMap<ViewKind, Body>,
    previous: Option<ViewKind>,
}

impl PegasusGui {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(config, Header::dashboard(), Body::Banner(Banner::new()), StatusBar::new())
    }

    pub fn with_parts(config: &Config, mut header: Header, body: Body, footer: StatusBar) -> Self {
        if let Some(release) = &config.openstack_release {
            header.set_openstack_rel(release);
        }
        Self {
            header,
            body,
            footer: Some(footer),
            parked: HashMap::new(),
            previous: None,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn footer(&self) -> Option<&StatusBar> {
        self.footer.as_ref()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn current_view(&self) -> ViewKind {
        self.body.kind()
    }

    /// The view shown before the current one.
    pub fn previous_view(&self) -> Option<ViewKind> {
        self.previous
    }

    pub fn is_parked(&self, kind: ViewKind) -> bool {
        self.parked.contains_key(&kind)
    }

    fn set_body(&mut self, body: Body) {
        let old = std::mem::replace(&mut self.body, body);
        let old_kind = old.kind();
        debug!("Body view: {:?} -> {:?}", old_kind, self.body.kind());
        if old_kind.is_cached() && old.is_reusable() {
            self.parked.insert(old_kind, old);
        }
        self.previous = Some(old_kind);
    }

    /// Make a cached view current, building it on first use.
    fn show_cached(&mut self, kind: ViewKind, create: impl FnOnce() -> Body) -> &mut Body {
        if self.body.kind() != kind || !self.body.is_reusable() {
            let body = match self.parked.remove(&kind) {
                Some(parked) if parked.is_reusable() => parked,
                _ => create(),
            };
            self.set_body(body);
        }
        &mut self.body
    }

    /// Bring back a parked view. Returns `false` if there is none.
    pub fn restore_view(&mut self, kind: ViewKind) -> bool {
        match self.parked.remove(&kind) {
            Some(body) => {
                self.set_body(body);
                true
            }
            None => false,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let footer_height = if self.footer.is_some() { 1 } else { 0 };
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(self.header.height()),
            Constraint::Min(0),
            Constraint::Length(footer_height),
        ])
        .areas(frame.area());

        self.header.render(frame, header_area);
        self.body.component().render(frame, body_area);
        if let Some(footer) = self.footer.as_mut() {
            footer.render(frame, footer_area);
        }
    }

    /// Hand a key to the body. Tab/Shift+Tab act as Down/Up. Returns the
    /// event if nothing consumed it.
    pub fn keypress(&mut self, ev: &mut EventLoop, event: &TuiEvent) -> Option<TuiEvent> {
        let event = match event {
            TuiEvent::Tab => TuiEvent::CursorDown,
            TuiEvent::BackTab => TuiEvent::CursorUp,
            other => other.clone(),
        };

        let outcome = match &mut self.body {
            Body::Dialog(dialog) => match dialog.handle_event(&event) {
                None => Outcome::Unhandled,
                Some(DialogEvent::Changed) => Outcome::Consumed,
                Some(DialogEvent::Submitted(values)) => Outcome::Submit(dialog.callback(), values),
                Some(DialogEvent::Cancelled) => Outcome::Abort,
            },
            Body::Selector(selector) => match selector.handle_event(&event) {
                None => Outcome::Unhandled,
                Some(SelectorEvent::Moved) => Outcome::Consumed,
                Some(SelectorEvent::Selected(choice)) => Outcome::Select(selector.callback(), choice),
                Some(SelectorEvent::Cancelled) => Outcome::Abort,
            },
            Body::Placement(view) => match view.handle_event(&event) {
                None => Outcome::Unhandled,
                Some(PlacementEvent::Moved) => Outcome::Consumed,
                Some(PlacementEvent::Deploy) => Outcome::Action(view.deploy_callback()),
                Some(PlacementEvent::Blocked(unplaced)) => Outcome::StatusError(format!(
                    "Cannot deploy yet, unplaced services: {}",
                    unplaced.join(", ")
                )),
            },
            Body::AddServices(dialog) => match dialog.handle_event(&event) {
                None => Outcome::Unhandled,
                Some(AddServicesEvent::Changed) => Outcome::Consumed,
                Some(AddServicesEvent::Deploy) => Outcome::Action(dialog.deploy_callback()),
                Some(AddServicesEvent::Cancel) => Outcome::Action(dialog.cancel_callback()),
            },
            Body::Help(view) => consumed(view.handle_event(&event)),
            Body::Services(view) => consumed(view.handle_event(&event)),
            _ => Outcome::Unhandled,
        };

        match outcome {
            Outcome::Unhandled => return Some(event),
            Outcome::Consumed => {}
            Outcome::Submit(callback, values) => callback(ev, self, &values),
            Outcome::Select(callback, choice) => callback(ev, self, &choice),
            Outcome::Action(callback) => callback(ev, self),
            Outcome::StatusError(message) => self.status_error_message(&message),
            Outcome::Abort => ev.abort(CANCEL_MESSAGE),
        }
        None
    }

    // ------------------------------------------------------------------
    // Body switching
    // ------------------------------------------------------------------

    pub fn show_banner(&mut self) {
        self.set_body(Body::Banner(Banner::new()));
    }

    pub fn show_help_info(&mut self) {
        self.set_body(Body::Help(HelpView::new()));
    }

    pub fn show_step_info(&mut self, msg: &str) {
        self.set_body(Body::StepInfo(StepInfoView::new(msg)));
    }

    pub fn show_selector_with_desc(
        &mut self,
        title: &str,
        opts: Vec<SelectorOption>,
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &str) + 'static,
    ) {
        self.set_body(Body::Selector(SelectorWithDescription::new(title, opts, cb)));
    }

    /// Show any pre-built dialog. It is shown (fields built) if it wasn't yet.
    pub fn show_dialog(&mut self, mut dialog: Dialog) {
        dialog.show();
        self.set_body(Body::Dialog(dialog));
    }

    pub fn show_password_input(
        &mut self,
        title: &str,
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
    ) {
        self.show_dialog(password_input(title, cb));
    }

    /// `known` pre-fills fields in order; `None` leaves one blank.
    pub fn show_maas_input(
        &mut self,
        title: &str,
        known: &[Option<&str>],
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
    ) {
        let mut dialog = maas_server_input(title, cb);
        dialog.prefill(known);
        self.show_dialog(dialog);
    }

    /// `known` pre-fills fields in order; `None` leaves one blank.
    pub fn show_landscape_input(
        &mut self,
        title: &str,
        known: &[Option<&str>],
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &DialogValues) + 'static,
    ) {
        let mut dialog = landscape_input(title, cb);
        dialog.prefill(known);
        self.show_dialog(dialog);
    }

    /// Ask which kind of installation to perform.
    pub fn select_install_type(
        &mut self,
        install_types: &[InstallType],
        cb: impl Fn(&mut EventLoop, &mut PegasusGui, &str) + 'static,
    ) {
        let opts = install_types
            .iter()
            .map(|t| SelectorOption::new(t.label(), t.description()))
            .collect();
        self.show_selector_with_desc(INSTALL_TYPE_PROMPT, opts, cb);
    }

    pub fn render_services_view(&mut self, nodes: Vec<ServiceNode>, config: &Config) {
        self.set_body(Body::Services(ServicesView::new(nodes)));
        self.header.set_show_add_units_hotkey(true);
        self.update_phase_status(config);
    }

    /// Refresh the services table, shown or parked. Returns `false` if it
    /// was never rendered.
    pub fn refresh_services_view(&mut self, nodes: Vec<ServiceNode>, config: &Config) -> bool {
        let view = match &mut self.body {
            Body::Services(view) => Some(view),
            _ => match self.parked.get_mut(&ViewKind::Services) {
                Some(Body::Services(view)) => Some(view),
                _ => None,
            },
        };
        let Some(view) = view else {
            debug!("refresh_services_view before render_services_view");
            return false;
        };
        view.refresh_nodes(nodes);
        self.update_phase_status(config);
        true
    }

    pub fn render_node_install_wait(&mut self, message: &str) {
        let body = self.show_cached(ViewKind::NodeInstallWait, || {
            Body::NodeInstallWait(NodeInstallWaitView::new(message))
        });
        if let Body::NodeInstallWait(view) = body {
            view.set_message(message);
        }
    }

    /// Show placement, building it from the controller's placement
    /// controller on first use. `cb` fires when the user deploys.
    pub fn render_placement_view(
        &mut self,
        controller: &dyn Controller,
        config: &Config,
        cb: impl Fn(&mut EventLoop, &mut PegasusGui) + 'static,
    ) {
        let deploy: UiAction = Rc::new(cb);
        let body = self.show_cached(ViewKind::Placement, || {
            Body::Placement(PlacementView::new(
                controller.placement_controller(),
                config,
                deploy.clone(),
            ))
        });
        if let Body::Placement(view) = body {
            view.set_deploy_callback(deploy);
            view.update();
        }
    }

    pub fn render_machine_wait_view(&mut self, controller: &dyn Controller, config: &Config) {
        let body = self.show_cached(ViewKind::MachineWait, || {
            Body::MachineWait(MachineWaitView::new(controller.current_installer(), config))
        });
        if let Body::MachineWait(view) = body {
            view.update();
        }
    }

    /// Show the add-services dialog. Deploying or cancelling ends that
    /// instance; the next call builds a fresh one.
    pub fn render_add_services_dialog(
        &mut self,
        pc: Rc<dyn PlacementController>,
        deploy_cb: impl Fn(&mut EventLoop, &mut PegasusGui) + 'static,
        cancel_cb: impl Fn(&mut EventLoop, &mut PegasusGui) + 'static,
    ) {
        let body = self.show_cached(ViewKind::AddServicesDialog, || {
            Body::AddServices(AddServicesDialog::new(pc, Rc::new(deploy_cb), Rc::new(cancel_cb)))
        });
        if let Body::AddServices(dialog) = body {
            dialog.update();
        }
    }

    /// Replace the body with the error view and cancel every pending alarm
    /// so background polling stops.
    pub fn show_exception_message(&mut self, ev: &mut EventLoop, err: &dyn std::error::Error) {
        let detail = err.to_string();
        error!("A fatal error has occurred: {detail}");
        self.set_body(Body::Error(ErrorView::new(&detail)));
        ev.remove_all_alarms();
    }

    // ------------------------------------------------------------------
    // Header / footer
    // ------------------------------------------------------------------

    pub fn set_openstack_rel(&mut self, release: &str) {
        self.header.set_openstack_rel(release);
    }

    fn footer_mut(&mut self) -> &mut StatusBar {
        self.footer.get_or_insert_with(StatusBar::new)
    }

    pub fn set_pending_deploys(&mut self, pending_charms: Vec<String>) {
        self.footer_mut().set_pending_deploys(pending_charms);
    }

    pub fn status_message(&mut self, text: &str) {
        self.footer_mut().show(text);
    }

    pub fn status_error_message(&mut self, message: &str) {
        self.footer_mut().show_error(message);
    }

    pub fn status_info_message(&mut self, message: &str) {
        self.footer_mut().show_info(message);
    }

    /// Remove the footer entirely; the next status call brings it back.
    pub fn clear_status(&mut self) {
        self.footer = None;
    }

    pub fn update_phase_status(&mut self, config: &Config) {
        self.status_info_message(&phase_status_line(config));
    }
}

fn consumed(event: Option<()>) -> Outcome {
    match event {
        Some(()) => Outcome::Consumed,
        None => Outcome::Unhandled,
    }
}

impl fmt::Debug for PegasusGui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<Ubuntu OpenStack Installer GUI Interface>")
    }
}
