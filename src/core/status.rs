//! # Deployment Status
//!
//! Plain data the controller hands to the dashboard views, plus the
//! phase-status line shown in the footer.

use crate::core::config::Config;

/// Juju agent state of a unit, reduced to what the dashboard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    #[default]
    Pending,
    Installing,
    Started,
    Error,
}

impl AgentState {
    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Pending => "pending",
            AgentState::Installing => "installing",
            AgentState::Started => "started",
            AgentState::Error => "error",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AgentState::Pending => "◌",
            AgentState::Installing => "◐",
            AgentState::Started => "●",
            AgentState::Error => "✗",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitStatus {
    pub name: String,
    pub agent_state: AgentState,
    pub public_address: Option<String>,
    pub machine: Option<String>,
    pub hardware: Option<String>,
    /// Extra detail, e.g. provisioning errors or unmet constraints
    pub info: Option<String>,
}

/// One row group of the services table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceNode {
    pub name: String,
    pub units: Vec<UnitStatus>,
}

impl ServiceNode {
    pub fn is_started(&self) -> bool {
        !self.units.is_empty() && self.units.iter().all(|u| u.agent_state == AgentState::Started)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineInfo {
    pub hostname: String,
    pub status: String,
    pub hardware: Option<String>,
}

/// What the installer is waiting for before it can place services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineWaitSummary {
    pub required: usize,
    pub machines: Vec<MachineInfo>,
}

impl MachineWaitSummary {
    pub fn is_satisfied(&self) -> bool {
        self.machines.len() >= self.required
    }
}

fn phase_label(done: bool) -> &'static str {
    if done { "complete" } else { "pending" }
}

/// Footer text describing the three deployment phases.
pub fn phase_status_line(config: &Config) -> String {
    format!(
        "Status: Deployments {}, Relations {}, Post-processing {} ",
        phase_label(config.deploy_complete),
        phase_label(config.relations_complete),
        phase_label(config.postproc_complete),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_status_all_pending() {
        let config = Config::default();
        assert_eq!(
            phase_status_line(&config),
            "Status: Deployments pending, Relations pending, Post-processing pending "
        );
    }

    #[test]
    fn test_phase_status_mixed() {
        let config = Config {
            deploy_complete: true,
            postproc_complete: true,
            ..Default::default()
        };
        assert_eq!(
            phase_status_line(&config),
            "Status: Deployments complete, Relations pending, Post-processing complete "
        );
    }

    #[test]
    fn test_service_started_requires_units() {
        let mut node = ServiceNode {
            name: "nova-compute".to_string(),
            units: Vec::new(),
        };
        assert!(!node.is_started());

        node.units.push(UnitStatus {
            name: "nova-compute/0".to_string(),
            agent_state: AgentState::Started,
            ..Default::default()
        });
        assert!(node.is_started());

        node.units.push(UnitStatus::default());
        assert!(!node.is_started());
    }
}
