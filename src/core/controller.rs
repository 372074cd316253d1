//! # Controller Collaborators
//!
//! The deployment controller lives outside this crate. These traits are the
//! narrow surface the views read from when they are first built and on every
//! `update()`. Everything here runs on the UI thread, so implementations
//! that need to mutate use interior mutability behind `&self`.

use std::rc::Rc;

use crate::core::status::MachineWaitSummary;

/// Services placed on one machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub machine: String,
    pub services: Vec<String>,
}

/// A service the user may add to an existing cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOption {
    pub name: String,
    pub description: String,
}

pub trait PlacementController {
    fn assignments(&self) -> Vec<Assignment>;

    /// Required services that have no machine yet.
    fn unplaced_services(&self) -> Vec<String>;

    fn addable_services(&self) -> Vec<ServiceOption>;

    /// Queue a service for deployment.
    fn add_service(&self, name: &str);

    fn can_deploy(&self) -> bool {
        self.unplaced_services().is_empty()
    }
}

/// The installer currently running (single, multi, landscape).
pub trait Installer {
    fn name(&self) -> &str;

    fn machine_wait(&self) -> MachineWaitSummary;
}

pub trait Controller {
    fn placement_controller(&self) -> Rc<dyn PlacementController>;

    fn current_installer(&self) -> Rc<dyn Installer>;
}
