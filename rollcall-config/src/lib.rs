//! Shared configuration library for the rollcall kiosk.
//!
//! Centralizes config defaults, source selection (file, inline JSON,
//! environment overrides) and validation so the binary and the tests read
//! settings the same way.
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::{BusyPolicy, CameraConfig, KioskConfig};
