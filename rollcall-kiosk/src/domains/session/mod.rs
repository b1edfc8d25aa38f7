//! Session domain
//!
//! The root state machine of the kiosk: which screen is showing, the
//! registration draft, the captured frame and the read-only snapshot the
//! presentation layer renders from.

pub mod controller;
pub mod messages;
pub mod state_types;
pub mod transitions;
pub mod update;

pub use controller::{ControllerSettings, SessionController};
pub use messages::SessionMessage;
pub use state_types::{
    CapturedFrame, MediaStatus, Mode, RegistrationDraft, SessionSnapshot, SessionStore,
};
pub use transitions::{CameraOutcome, ModeChange, ModeTransitions};
pub use update::{UpdateOutcome, update};
