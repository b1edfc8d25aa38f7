//! Backend routes.

use std::fmt;

/// Liveness check; answers with a plain-text banner.
pub const HEALTH: &str = "/";
/// Face registration (multipart: `name`, `roll_no`, `image`).
pub const REGISTER: &str = "/register";
/// Attendance scan of a single captured image (multipart: `image`).
pub const SCAN_IMAGE: &str = "/scan_image";
/// Model (re)training, no body.
pub const TRAIN: &str = "/train";
/// Raw attendance log download.
pub const GET_LOG: &str = "/get_log";

/// The four operations the kiosk can issue against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Scan,
    Train,
    FetchLog,
}

impl Operation {
    pub const ALL: [Self; 4] =
        [Self::Register, Self::Scan, Self::Train, Self::FetchLog];

    /// HTTP method used for this operation.
    pub fn method(self) -> &'static str {
        match self {
            Self::FetchLog => "GET",
            Self::Register | Self::Scan | Self::Train => "POST",
        }
    }

    /// Path relative to the configured backend address.
    pub fn path(self) -> &'static str {
        match self {
            Self::Register => REGISTER,
            Self::Scan => SCAN_IMAGE,
            Self::Train => TRAIN,
            Self::FetchLog => GET_LOG,
        }
    }

    /// Human readable label, used in progress and failure messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Register => "Registration",
            Self::Scan => "Scan",
            Self::Train => "Training",
            Self::FetchLog => "Attendance log fetch",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
