//! Application wiring: configuration, service construction and the console
//! front end.

pub mod bootstrap;
pub mod console;

pub use bootstrap::{AppConfig, Runtime, check_backend, runtime_boot};
