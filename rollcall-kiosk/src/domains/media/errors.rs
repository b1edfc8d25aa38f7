//! Camera and capture error types

use thiserror::Error;

/// A failure reported by the camera stack, named the way browsers name
/// `getUserMedia` failures (`NotAllowedError`, `NotFoundError`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct DeviceError {
    pub name: String,
    pub message: String,
}

impl DeviceError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The user or platform refused camera access.
    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new("NotAllowedError", message)
    }

    /// No camera matches the constraints.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NotFoundError", message)
    }

    /// A camera exists but could not be opened or read.
    pub fn not_readable(message: impl Into<String>) -> Self {
        Self::new("NotReadableError", message)
    }

    /// The constraints themselves are unsatisfiable.
    pub fn overconstrained(message: impl Into<String>) -> Self {
        Self::new("OverconstrainedError", message)
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Acquire was called while a session is already live. The live session
    /// is kept as is.
    #[error("a camera session is already active")]
    AlreadyActive,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    /// No live session, or the preview has not decoded a frame yet.
    #[error("camera not ready")]
    NotReady,

    #[error("failed to encode frame")]
    Encode(#[from] image::ImageError),

    #[error("frame encoder task failed")]
    Join(#[from] tokio::task::JoinError),

    /// The session the frame came from was released before the encode
    /// finished; the frame was dropped.
    #[error("camera session ended before the photo was stored")]
    SessionEnded,
}
