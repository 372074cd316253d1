//! # Setup Wizard
//!
//! Collects the answers the installer needs before deployment can begin:
//! the installation type, credentials for the cloud-management backends that
//! type relies on, and the OpenStack admin password.
//!
//! ```text
//! SelectInstallType ──► MaasCredentials ──────┐
//!         │                                   ├──► Password ──► Summary
//!         └──────────► LandscapeCredentials ──┘
//! ```
//!
//! The step to show is always derived from what is still missing, so answers
//! pre-filled from the config file skip their dialogs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::Config;

/// Kind of cloud the installer deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// Everything in containers on this machine
    Single,
    /// Services spread across MAAS-managed machines
    Multi,
    /// OpenStack Autopilot driven by Landscape
    Landscape,
}

impl InstallType {
    pub const ALL: [InstallType; 3] = [Self::Single, Self::Multi, Self::Landscape];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Multi => "Multi",
            Self::Landscape => "Landscape OpenStack Autopilot",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Single => {
                "Deploy OpenStack on this machine using LXD containers. \
                 Suitable for evaluation and development."
            }
            Self::Multi => {
                "Deploy OpenStack across multiple physical machines managed \
                 by an existing MAAS server."
            }
            Self::Landscape => {
                "Let Landscape design and deploy the cloud for you. Requires \
                 a MAAS server and a Landscape administrator account."
            }
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The next thing the wizard has to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectInstallType,
    MaasCredentials,
    LandscapeCredentials,
    Password,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    EmptyPassword,
    PasswordMismatch,
    MissingField(&'static str),
}

impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardError::EmptyPassword => write!(f, "password must not be empty"),
            WizardError::PasswordMismatch => write!(f, "passwords do not match"),
            WizardError::MissingField(name) => write!(f, "missing required setting: {name}"),
        }
    }
}

impl std::error::Error for WizardError {}

/// Answers gathered so far. `None` means "still to ask".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupAnswers {
    pub install_type: Option<InstallType>,
    pub password: Option<String>,
    pub maas_server: Option<String>,
    pub maas_api_key: Option<String>,
    pub landscape_admin_email: Option<String>,
    pub landscape_admin_name: Option<String>,
}

impl SetupAnswers {
    pub fn from_config(config: &Config) -> Self {
        Self {
            install_type: config.install_type,
            password: config.openstack_password.clone(),
            maas_server: config.maas_server.clone(),
            maas_api_key: config.maas_api_key.clone(),
            landscape_admin_email: config.landscape_admin_email.clone(),
            landscape_admin_name: config.landscape_admin_name.clone(),
        }
    }

    pub fn next_step(&self) -> WizardStep {
        let Some(install_type) = self.install_type else {
            return WizardStep::SelectInstallType;
        };
        let has_maas = self.maas_server.is_some() && self.maas_api_key.is_some();
        match install_type {
            InstallType::Multi if !has_maas => return WizardStep::MaasCredentials,
            InstallType::Landscape
                if !has_maas
                    || self.landscape_admin_email.is_none()
                    || self.landscape_admin_name.is_none() =>
            {
                return WizardStep::LandscapeCredentials;
            }
            _ => {}
        }
        if self.password.is_none() {
            return WizardStep::Password;
        }
        WizardStep::Summary
    }

    /// Record a password entered twice; both entries must match.
    pub fn set_password(&mut self, password: &str, confirm: &str) -> Result<(), WizardError> {
        if password.is_empty() {
            return Err(WizardError::EmptyPassword);
        }
        if password != confirm {
            return Err(WizardError::PasswordMismatch);
        }
        self.password = Some(password.to_string());
        Ok(())
    }

    /// Headless runs cannot prompt, so every answer must already be known.
    pub fn require_complete(&self) -> Result<(), WizardError> {
        match self.next_step() {
            WizardStep::SelectInstallType => Err(WizardError::MissingField("install_type")),
            WizardStep::MaasCredentials => Err(WizardError::MissingField("maas.server/maas.api_key")),
            WizardStep::LandscapeCredentials => Err(WizardError::MissingField("landscape.admin_email/admin_name")),
            WizardStep::Password => Err(WizardError::MissingField("openstack_password")),
            WizardStep::Summary => Ok(()),
        }
    }

    /// Human-readable recap. The password is never included.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(install_type) = self.install_type {
            lines.push(format!("Installation type: {install_type}"));
        }
        if let Some(server) = &self.maas_server {
            lines.push(format!("MAAS server: {server}"));
        }
        if let Some(email) = &self.landscape_admin_email {
            let name = self.landscape_admin_name.as_deref().unwrap_or("");
            lines.push(format!("Landscape admin: {name} <{email}>"));
        }
        if self.password.is_some() {
            lines.push("OpenStack admin password: set".to_string());
        }
        lines
    }

    pub fn apply_to(&self, config: &mut Config) {
        config.install_type = self.install_type;
        config.openstack_password = self.password.clone();
        config.maas_server = self.maas_server.clone();
        config.maas_api_key = self.maas_api_key.clone();
        config.landscape_admin_email = self.landscape_admin_email.clone();
        config.landscape_admin_name = self.landscape_admin_name.clone();
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl SetupAnswers {
    pub fn set_maas(&mut self, server: &str, api_key: &str) {
        self.maas_server = non_empty(server);
        self.maas_api_key = non_empty(api_key);
    }

    pub fn set_landscape(&mut self, email: &str, name: &str, maas_server: &str, maas_api_key: &str) {
        self.landscape_admin_email = non_empty(email);
        self.landscape_admin_name = non_empty(name);
        self.set_maas(maas_server, maas_api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answers_start_with_install_type() {
        assert_eq!(SetupAnswers::default().next_step(), WizardStep::SelectInstallType);
    }

    #[test]
    fn test_single_goes_straight_to_password() {
        let answers = SetupAnswers {
            install_type: Some(InstallType::Single),
            ..Default::default()
        };
        assert_eq!(answers.next_step(), WizardStep::Password);
    }

    #[test]
    fn test_multi_requires_maas_credentials() {
        let mut answers = SetupAnswers {
            install_type: Some(InstallType::Multi),
            ..Default::default()
        };
        assert_eq!(answers.next_step(), WizardStep::MaasCredentials);

        answers.set_maas("10.0.0.5", "  ");
        assert_eq!(answers.next_step(), WizardStep::MaasCredentials);

        answers.set_maas("10.0.0.5", "key:abc");
        assert_eq!(answers.next_step(), WizardStep::Password);
    }

    #[test]
    fn test_landscape_requires_admin_and_maas() {
        let mut answers = SetupAnswers {
            install_type: Some(InstallType::Landscape),
            ..Default::default()
        };
        answers.set_maas("10.0.0.5", "key");
        assert_eq!(answers.next_step(), WizardStep::LandscapeCredentials);

        answers.set_landscape("admin@example.com", "Admin", "10.0.0.5", "key");
        assert_eq!(answers.next_step(), WizardStep::Password);
    }

    #[test]
    fn test_password_validation() {
        let mut answers = SetupAnswers::default();
        assert_eq!(answers.set_password("", ""), Err(WizardError::EmptyPassword));
        assert_eq!(answers.set_password("abc", "abd"), Err(WizardError::PasswordMismatch));
        assert!(answers.password.is_none());

        answers.set_password("s3cret", "s3cret").unwrap();
        assert_eq!(answers.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_summary_never_contains_password() {
        let answers = SetupAnswers {
            install_type: Some(InstallType::Multi),
            password: Some("hunter2".to_string()),
            maas_server: Some("10.0.0.5".to_string()),
            maas_api_key: Some("key".to_string()),
            ..Default::default()
        };
        let text = answers.summary_lines().join("\n");
        assert!(text.contains("Installation type: Multi"));
        assert!(text.contains("MAAS server: 10.0.0.5"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn test_require_complete_names_missing_field() {
        let answers = SetupAnswers {
            install_type: Some(InstallType::Single),
            ..Default::default()
        };
        assert_eq!(
            answers.require_complete(),
            Err(WizardError::MissingField("openstack_password"))
        );
    }

    #[test]
    fn test_install_type_label_lookup() {
        for install_type in InstallType::ALL {
            assert_eq!(InstallType::from_label(install_type.label()), Some(install_type));
        }
        assert_eq!(InstallType::from_label("Bogus"), None);
    }
}
