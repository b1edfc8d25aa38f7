//! Domain modules for the kiosk
//!
//! The session domain is the root state machine. It drives the media domain
//! (camera lifecycle and frame capture), routes every user-facing outcome
//! through the feedback domain, and delegates backend calls to the requests
//! domain.

pub mod feedback;
pub mod media;
pub mod requests;
pub mod session;
