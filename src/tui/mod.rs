//! # TUI Adapter
//!
//! The ratatui-specific layer: the event loop, the `PegasusGui` view
//! container, its components, and the setup wizard built on them.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Threading
//!
//! Everything here runs on one thread. Callbacks receive `&mut EventLoop`
//! and `&mut PegasusGui` explicitly; background workers reach the UI only by
//! posting closures through a [`event_loop::UiSender`].

pub mod component;
pub mod components;
pub mod event;
pub mod event_loop;
pub mod gui;
pub mod palette;
pub mod wizard;

pub use event_loop::{EventLoop, UiSender};
pub use gui::{Body, PegasusGui};
