//! Ubuntu OpenStack installer: terminal UI library

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
