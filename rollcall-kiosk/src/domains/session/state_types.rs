//! Session state and its store
//!
//! Everything the presentation layer can see lives in one
//! [`SessionSnapshot`]. Mutations go through the controller's named entry
//! points; readers get clones or subscribe to a watch channel.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rollcall_model::forms::CAPTURE_FILE_NAME;
use rollcall_model::{ImagePayload, Operation, RegisterForm};
use tokio::sync::watch;
use uuid::Uuid;

use crate::domains::feedback::Notification;

/// The four screens of the kiosk. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Home,
    Register,
    Scan,
    Log,
}

impl Mode {
    pub const ALL: [Self; 4] = [Self::Home, Self::Register, Self::Scan, Self::Log];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Register => "Register Face",
            Self::Scan => "Scan Attendance",
            Self::Log => "Attendance Log",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Registration form contents. Survives navigation; only a successful
/// registration clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub name: String,
    pub roll_no: String,
    pub image: Option<ImagePayload>,
}

impl RegistrationDraft {
    /// Human readable names of the fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.roll_no.trim().is_empty() {
            missing.push("roll number");
        }
        if self.image.as_ref().is_none_or(ImagePayload::is_empty) {
            missing.push("image");
        }
        missing
    }

    /// Build the request body, or report which fields are missing.
    pub fn to_form(&self) -> Result<RegisterForm, Vec<&'static str>> {
        let missing = self.missing_fields();
        match (&self.image, missing.is_empty()) {
            (Some(image), true) => Ok(RegisterForm {
                name: self.name.trim().to_string(),
                roll_no: self.roll_no.trim().to_string(),
                image: image.clone(),
            }),
            _ => Err(missing),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Load an image file from disk as a registration upload.
pub async fn image_from_path(path: &Path) -> std::io::Result<ImagePayload> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = ImagePayload::mime_for_file_name(&file_name);
    Ok(ImagePayload::new(file_name, mime, bytes))
}

/// A still frame frozen from the live preview, encoded as JPEG.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub id: Uuid,
    /// Media session the frame was taken from.
    pub session_id: Uuid,
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

impl CapturedFrame {
    pub fn to_payload(&self) -> ImagePayload {
        ImagePayload::jpeg(CAPTURE_FILE_NAME, self.jpeg.clone())
    }
}

impl std::fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedFrame")
            .field("id", &self.id)
            .field("session_id", &self.session_id)
            .field("size", &format_args!("{}x{}", self.width, self.height))
            .field("jpeg_len", &self.jpeg.len())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

/// What the presentation layer may know about the camera.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaStatus {
    pub session_id: Option<Uuid>,
    /// Native size of the live preview, once decoded.
    pub dimensions: Option<(u32, u32)>,
}

impl MediaStatus {
    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }
}

/// Complete read-only view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub draft: RegistrationDraft,
    pub captured_frame: Option<CapturedFrame>,
    pub media: MediaStatus,
    pub notification: Notification,
    pub busy: bool,
    /// Operation that most recently raised the busy flag.
    pub in_flight: Option<Operation>,
    pub attendance_log: Option<String>,
    pub started: bool,
    /// Bumped on every `show`; lets a stale expiry timer recognise that its
    /// notification has been superseded.
    pub(crate) notification_seq: u64,
}

/// Shared session state backed by a watch channel.
#[derive(Clone, Debug)]
pub struct SessionStore {
    sender: Arc<watch::Sender<SessionSnapshot>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(SessionSnapshot::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Clone of the current state.
    pub fn current(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    /// Access state without cloning.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionSnapshot) -> R,
    {
        f(&self.sender.borrow())
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }

    /// Apply a mutation and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionSnapshot),
    {
        self.sender.send_modify(f);
    }

    /// Apply a mutation that may decline to change anything. Subscribers are
    /// only woken when `f` returns `true`.
    pub fn update_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut SessionSnapshot) -> bool,
    {
        self.sender.send_if_modified(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_reports_every_missing_field() {
        let draft = RegistrationDraft::default();
        assert_eq!(draft.missing_fields(), vec!["name", "roll number", "image"]);

        let draft = RegistrationDraft {
            name: "  ".into(),
            roll_no: "42".into(),
            image: Some(ImagePayload::jpeg("a.jpg", Vec::new())),
        };
        assert_eq!(draft.missing_fields(), vec!["name", "image"]);
    }

    #[test]
    fn complete_draft_builds_trimmed_form() {
        let draft = RegistrationDraft {
            name: " Alice ".into(),
            roll_no: "CS-042\n".into(),
            image: Some(ImagePayload::jpeg("alice.jpg", vec![1, 2, 3])),
        };
        let form = draft.to_form().unwrap();
        assert_eq!(form.name, "Alice");
        assert_eq!(form.roll_no, "CS-042");
        assert_eq!(form.image.file_name, "alice.jpg");
    }

    #[test]
    fn update_if_only_notifies_on_change() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        assert!(!store.update_if(|_| false));
        assert!(!rx.has_changed().unwrap());

        assert!(store.update_if(|s| {
            s.mode = Mode::Log;
            true
        }));
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.current().mode, Mode::Log);
    }
}
