//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::core::config::Config;
use crate::core::controller::{
    Assignment, Controller, Installer, PlacementController, ServiceOption,
};
use crate::core::status::{MachineInfo, MachineWaitSummary};
use crate::tui::event_loop::EventLoop;
use crate::tui::gui::{PegasusGui, UiAction};

/// Panic payload standing in for `process::exit`.
#[derive(Debug)]
pub struct ExitCalled(pub i32);

/// Terminator for `EventLoop::with_terminator` that unwinds instead of
/// exiting, so tests can observe the exit code.
pub fn panicking_exit(code: i32) -> ! {
    panic::panic_any(ExitCalled(code))
}

/// Run `f` and return the code passed to [`panicking_exit`], if it was
/// called. Any other panic is propagated.
pub fn exit_code_of(f: impl FnOnce()) -> Option<i32> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => None,
        Err(payload) => match payload.downcast::<ExitCalled>() {
            Ok(exit) => Some(exit.0),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// A dashboard GUI over default settings.
pub fn test_gui() -> PegasusGui {
    PegasusGui::new(&Config::default())
}

pub fn noop_action() -> UiAction {
    Rc::new(|_: &mut EventLoop, _: &mut PegasusGui| {})
}

/// Render the whole GUI into a `width` x `height` buffer and return its text.
pub fn render_to_string(gui: &mut PegasusGui, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| gui.render(f)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

// ============================================================================
// Controller fakes
// ============================================================================

/// One machine with keystone and glance, two addable services.
pub struct FakePlacement {
    pub unplaced: RefCell<Vec<String>>,
    pub added: RefCell<Vec<String>>,
}

impl FakePlacement {
    pub fn new() -> Self {
        Self {
            unplaced: RefCell::new(Vec::new()),
            added: RefCell::new(Vec::new()),
        }
    }
}

impl PlacementController for FakePlacement {
    fn assignments(&self) -> Vec<Assignment> {
        vec![Assignment {
            machine: "machine-1".to_string(),
            services: vec!["keystone".to_string(), "glance".to_string()],
        }]
    }

    fn unplaced_services(&self) -> Vec<String> {
        self.unplaced.borrow().clone()
    }

    fn addable_services(&self) -> Vec<ServiceOption> {
        vec![
            ServiceOption {
                name: "swift".to_string(),
                description: "Object storage".to_string(),
            },
            ServiceOption {
                name: "nova-compute".to_string(),
                description: "Additional compute capacity".to_string(),
            },
        ]
    }

    fn add_service(&self, name: &str) {
        self.added.borrow_mut().push(name.to_string());
    }
}

pub struct FakeInstaller {
    name: String,
    required: usize,
    machines: RefCell<Vec<MachineInfo>>,
    pub wait_queries: Cell<usize>,
}

impl FakeInstaller {
    pub fn new(name: &str, required: usize) -> Self {
        Self {
            name: name.to_string(),
            required,
            machines: RefCell::new(Vec::new()),
            wait_queries: Cell::new(0),
        }
    }

    pub fn add_machine(&self, hostname: &str) {
        self.machines.borrow_mut().push(MachineInfo {
            hostname: hostname.to_string(),
            status: "Ready".to_string(),
            hardware: Some("arch=amd64 cpu=4 mem=8G".to_string()),
        });
    }
}

impl Installer for FakeInstaller {
    fn name(&self) -> &str {
        &self.name
    }

    fn machine_wait(&self) -> MachineWaitSummary {
        self.wait_queries.set(self.wait_queries.get() + 1);
        MachineWaitSummary {
            required: self.required,
            machines: self.machines.borrow().clone(),
        }
    }
}

/// Counts how often views ask for their collaborators.
pub struct FakeController {
    pub placement: Rc<FakePlacement>,
    pub installer: Rc<FakeInstaller>,
    pub placement_requests: Cell<usize>,
    pub installer_requests: Cell<usize>,
}

impl FakeController {
    pub fn new() -> Self {
        Self {
            placement: Rc::new(FakePlacement::new()),
            installer: Rc::new(FakeInstaller::new("Multi", 3)),
            placement_requests: Cell::new(0),
            installer_requests: Cell::new(0),
        }
    }
}

impl Controller for FakeController {
    fn placement_controller(&self) -> Rc<dyn PlacementController> {
        self.placement_requests.set(self.placement_requests.get() + 1);
        self.placement.clone()
    }

    fn current_installer(&self) -> Rc<dyn Installer> {
        self.installer_requests.set(self.installer_requests.get() + 1);
        self.installer.clone()
    }
}
