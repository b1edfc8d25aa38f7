//! Rollcall kiosk library
//!
//! This crate contains the attendance kiosk's library surfaces used by the
//! executable in `src/main.rs`: the session workflow controller and its
//! domains (media, feedback, requests), plus the infrastructure that talks
//! to the recognition backend and to camera devices.
//!
//! Notes
//! - Public items are subject to change while the presentation layer evolves.
//! - Most consumers should use the `rollcall-kiosk` binary; the library is
//!   exposed mainly to enable testing and alternative front ends.

pub mod app;
pub mod domains;
pub mod infra;
pub mod view;

pub use domains::session::{Mode, SessionController, SessionSnapshot};
