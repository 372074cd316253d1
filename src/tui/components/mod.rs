//! # TUI Components
//!
//! Every region of the installer screen is a component here.
//!
//! ## Component Architecture
//!
//! ### Frame pieces (props-based)
//!
//! - `Header`: title and hotkey hints
//! - `StatusBar`: footer status message and pending deploys
//!
//! ### Body views
//!
//! Exactly one fills the body at a time (see `gui::Body`):
//! - `Banner`, `StepInfoView`, `NodeInstallWaitView`, `MachineWaitView`,
//!   `ErrorView`: read-only
//! - `ServicesView`, `HelpView`: scroll/selection only
//! - `Dialog`, `SelectorWithDescription`, `PlacementView`,
//!   `AddServicesDialog`: interactive, emit high-level events that
//!   `PegasusGui` turns into callbacks
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── header.rs        (title + hotkeys)
//! ├── status_bar.rs    (footer)
//! ├── banner.rs        (startup splash)
//! ├── edit_input.rs    (single-line text field)
//! ├── dialog.rs        (modal form + installer dialogs)
//! ├── selector.rs      (choice list with descriptions)
//! ├── help.rs          (scrollable help text)
//! ├── services.rs      (services table)
//! ├── waits.rs         (machine/node wait, step info)
//! ├── error_view.rs    (fatal error)
//! ├── placement.rs     (machine placement)
//! └── add_services.rs  (add services checklist)
//! ```

use ratatui::layout::Rect;

mod add_services;
mod banner;
mod dialog;
mod edit_input;
mod error_view;
mod header;
mod help;
mod placement;
mod selector;
mod services;
mod status_bar;
mod waits;

pub use add_services::{AddServicesDialog, AddServicesEvent, CheckboxState};
pub use banner::Banner;
pub use dialog::{
    Dialog, DialogEvent, DialogState, DialogValues, landscape_input, maas_server_input,
    password_input,
};
pub use edit_input::EditInput;
pub use error_view::ErrorView;
pub use header::{Header, HeaderMode};
pub use help::HelpView;
pub use placement::{PlacementEvent, PlacementView};
pub use selector::{SelectorEvent, SelectorOption, SelectorWithDescription};
pub use services::ServicesView;
pub use status_bar::{StatusBar, StatusLevel};
pub use waits::{MachineWaitView, NodeInstallWaitView, StepInfoView};

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub(crate) fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
