use std::path::PathBuf;

use super::state_types::Mode;

/// Presentation intents understood by [`super::update::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionMessage {
    // Navigation
    Navigate(Mode),

    // Registration draft
    UpdateName(String),
    UpdateRollNo(String),
    PickImage(PathBuf),
    ClearImage,

    // Camera
    Capture,

    // Backend operations
    Register,
    Scan,
    Train,
    FetchLog,

    DismissNotification,
}

impl SessionMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "Session::Navigate",
            Self::UpdateName(_) => "Session::UpdateName",
            Self::UpdateRollNo(_) => "Session::UpdateRollNo",
            Self::PickImage(_) => "Session::PickImage",
            Self::ClearImage => "Session::ClearImage",
            Self::Capture => "Session::Capture",
            Self::Register => "Session::Register",
            Self::Scan => "Session::Scan",
            Self::Train => "Session::Train",
            Self::FetchLog => "Session::FetchLog",
            Self::DismissNotification => "Session::DismissNotification",
        }
    }

    /// Whether handling this message may hold the busy flag.
    pub fn is_backend_operation(&self) -> bool {
        matches!(self, Self::Register | Self::Scan | Self::Train | Self::FetchLog)
    }
}
