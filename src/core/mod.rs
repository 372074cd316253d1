//! # Core Installer Logic
//!
//! Everything here is independent of the terminal: settings, timers, the
//! wizard's answer model, and the data the deployment controller feeds the
//! dashboard.
//!
//! ```text
//!      ┌──────────────────────────────┐
//!      │            CORE              │
//!      │                              │
//!      │  • config   (settings)       │
//!      │  • alarm    (timer queue)    │
//!      │  • wizard   (setup answers)  │
//!      │  • status   (service data)   │
//!      │  • view     (screen kinds)   │
//!      │  • controller (traits)       │
//!      │                              │
//!      │  No terminal I/O.            │
//!      └──────────────┬───────────────┘
//!                     ▼
//!              ┌────────────┐
//!              │    TUI     │
//!              │  Adapter   │
//!              │ (ratatui)  │
//!              └────────────┘
//! ```

pub mod alarm;
pub mod config;
pub mod controller;
pub mod status;
pub mod view;
pub mod wizard;
