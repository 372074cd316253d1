//! # Setup Wizard
//!
//! Drives the interactive setup: banner, install type, credentials for that
//! type, admin password, summary. Each step is shown by [`advance`], which
//! asks [`SetupAnswers::next_step`] what is still missing, so a rejected
//! answer simply shows the same step again. Credential dialogs open with
//! whatever the answers already hold, so values from the config file are
//! kept unless the user edits them.
//!
//! Hotkeys (keys no view consumed):
//! - `Q` quit (status 0 once setup is complete, 1 before)
//! - `H` help
//! - `S` / `Esc` from help: back to the current step
//! - `R` re-show the current step, unless a dialog is being filled in

use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::core::view::ViewKind;
use crate::core::wizard::{InstallType, SetupAnswers, WizardStep};
use crate::tui::components::DialogValues;
use crate::tui::event::TuiEvent;
use crate::tui::event_loop::EventLoop;
use crate::tui::gui::PegasusGui;

pub type SharedAnswers = Rc<RefCell<SetupAnswers>>;

/// How long the banner stays up before the first question.
pub const BANNER_DELAY: Duration = Duration::from_secs(1);

/// Install hotkeys and schedule the first step after the banner.
pub fn start(ev: &mut EventLoop, gui: &mut PegasusGui, answers: SharedAnswers) {
    gui.show_banner();
    gui.status_info_message("Starting setup");

    let hotkey_answers = answers.clone();
    ev.set_unhandled_input(move |ev, gui, event| {
        handle_hotkey(ev, gui, &hotkey_answers, event);
    });
    ev.set_alarm_in(BANNER_DELAY, move |ev, gui| advance(ev, gui, &answers));
}

/// Show the screen for whatever the answers still lack.
pub fn advance(ev: &mut EventLoop, gui: &mut PegasusGui, answers: &SharedAnswers) {
    let step = answers.borrow().next_step();
    debug!("Wizard step: {step:?}");
    match step {
        WizardStep::SelectInstallType => {
            let answers = answers.clone();
            gui.select_install_type(&InstallType::ALL, move |ev, gui, choice| {
                match InstallType::from_label(choice) {
                    Some(install_type) => {
                        info!("Install type selected: {install_type}");
                        answers.borrow_mut().install_type = Some(install_type);
                        gui.clear_status();
                    }
                    None => gui.status_error_message(&format!("Unknown install type: {choice}")),
                }
                advance(ev, gui, &answers);
            });
        }
        WizardStep::MaasCredentials => {
            let known = answers.borrow().clone();
            let answers = answers.clone();
            let prefill = [known.maas_server.as_deref(), known.maas_api_key.as_deref()];
            gui.show_maas_input("Enter MAAS IP and API Key", &prefill, move |ev, gui, values| {
                answers
                    .borrow_mut()
                    .set_maas(field(values, 0), field(values, 1));
                require_progress(gui, &answers, WizardStep::MaasCredentials);
                advance(ev, gui, &answers);
            });
        }
        WizardStep::LandscapeCredentials => {
            let known = answers.borrow().clone();
            let answers = answers.clone();
            let prefill = [
                known.landscape_admin_email.as_deref(),
                known.landscape_admin_name.as_deref(),
                known.maas_server.as_deref(),
                known.maas_api_key.as_deref(),
            ];
            let title = "Landscape OpenStack Autopilot Setup";
            gui.show_landscape_input(title, &prefill, move |ev, gui, values| {
                answers.borrow_mut().set_landscape(
                    field(values, 0),
                    field(values, 1),
                    field(values, 2),
                    field(values, 3),
                );
                require_progress(gui, &answers, WizardStep::LandscapeCredentials);
                advance(ev, gui, &answers);
            });
        }
        WizardStep::Password => {
            let answers = answers.clone();
            gui.show_password_input("Create a new Openstack Password", move |ev, gui, values| {
                let result = answers
                    .borrow_mut()
                    .set_password(field(values, 0), field(values, 1));
                if let Err(e) = result {
                    warn!("Password rejected: {e}");
                    gui.status_error_message(&format!("{e}, please try again"));
                }
                advance(ev, gui, &answers);
            });
        }
        WizardStep::Summary => {
            let answers = answers.borrow();
            answers.apply_to(ev.config_mut());
            let mut text = answers.summary_lines().join("\n");
            text.push_str("\n\nPress (Q) to finish setup.");
            gui.show_step_info(&text);
            gui.status_message("Setup complete");
            info!("Setup answers complete");
        }
    }
}

fn field(values: &DialogValues, index: usize) -> &str {
    values.value(index).unwrap_or("")
}

fn require_progress(gui: &mut PegasusGui, answers: &SharedAnswers, step: WizardStep) {
    if answers.borrow().next_step() == step {
        gui.status_error_message("All fields are required");
    }
}

fn handle_hotkey(
    ev: &mut EventLoop,
    gui: &mut PegasusGui,
    answers: &SharedAnswers,
    event: &TuiEvent,
) {
    match event {
        TuiEvent::InputChar('q' | 'Q') => {
            let complete = answers.borrow().next_step() == WizardStep::Summary;
            ev.exit(if complete { 0 } else { 1 });
        }
        TuiEvent::InputChar('h' | 'H') => gui.show_help_info(),
        TuiEvent::InputChar('s' | 'S') | TuiEvent::Escape
            if gui.current_view() == ViewKind::Help =>
        {
            advance(ev, gui, answers);
        }
        TuiEvent::InputChar('r' | 'R') if !gui.current_view().is_dialog() => {
            advance(ev, gui, answers);
        }
        other => debug!("Ignored key in setup: {other:?}"),
    }
}
