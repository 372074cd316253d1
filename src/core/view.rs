/// Which screen fills the body region. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Banner,
    Services,
    MachineWait,
    NodeInstallWait,
    Help,
    StepInfo,
    Placement,
    AddServicesDialog,
    Error,
    Selector,
    PasswordInput,
    MaasInput,
    LandscapeInput,
    Dialog,
}

impl ViewKind {
    /// Views built once and kept for reuse when switched away from.
    pub fn is_cached(&self) -> bool {
        matches!(
            self,
            ViewKind::Services
                | ViewKind::MachineWait
                | ViewKind::NodeInstallWait
                | ViewKind::Placement
                | ViewKind::AddServicesDialog
        )
    }

    pub fn is_dialog(&self) -> bool {
        matches!(
            self,
            ViewKind::PasswordInput | ViewKind::MaasInput | ViewKind::LandscapeInput | ViewKind::Dialog
        )
    }
}
