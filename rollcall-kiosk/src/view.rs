//! Text rendering of a session snapshot
//!
//! Pure functions over [`SessionSnapshot`]; the console prints whatever these
//! return.

use std::fmt::Write as _;

use crate::domains::feedback::{Notification, NotificationKind};
use crate::domains::session::{Mode, SessionSnapshot};

const RULE: &str = "----------------------------------------";

fn notification_line(notification: &Notification) -> Option<String> {
    let tag = match notification.kind {
        NotificationKind::None => return None,
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
    };
    Some(format!("[{tag}] {}", notification.text))
}

/// One line summary, printed whenever the visible state changes.
pub fn status_line(snapshot: &SessionSnapshot) -> String {
    let mut line = format!("<{}>", snapshot.mode);
    if snapshot.busy {
        let _ = write!(line, " busy");
        if let Some(op) = snapshot.in_flight {
            let _ = write!(line, " ({op})");
        }
    }
    if let Some(text) = notification_line(&snapshot.notification) {
        let _ = write!(line, " {text}");
    }
    line
}

pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", snapshot.mode.title());
    let _ = writeln!(out, "{RULE}");

    match snapshot.mode {
        Mode::Home => {
            let _ = writeln!(out, "Choose a screen: go register | go scan | fetch-log");
            let _ = writeln!(out, "Retrain the recognizer with: train");
        }
        Mode::Register => {
            let draft = &snapshot.draft;
            let _ = writeln!(out, "Name:        {}", draft.name);
            let _ = writeln!(out, "Roll number: {}", draft.roll_no);
            let image = draft
                .image
                .as_ref()
                .map(|img| format!("{} ({} bytes)", img.file_name, img.len()))
                .unwrap_or_else(|| "(none)".to_string());
            let _ = writeln!(out, "Image:       {image}");
        }
        Mode::Scan => {
            let camera = match (snapshot.media.session_id, snapshot.media.dimensions) {
                (Some(_), Some((w, h))) => format!("live {w}x{h}"),
                (Some(_), None) => "starting".to_string(),
                (None, _) => "unavailable".to_string(),
            };
            let _ = writeln!(out, "Camera:  {camera}");
            let frame = snapshot
                .captured_frame
                .as_ref()
                .map(|f| format!("{}x{} JPEG, {} bytes", f.width, f.height, f.jpeg.len()))
                .unwrap_or_else(|| "(none)".to_string());
            let _ = writeln!(out, "Capture: {frame}");
        }
        Mode::Log => match &snapshot.attendance_log {
            Some(log) if !log.trim().is_empty() => {
                let _ = writeln!(out, "{}", log.trim_end());
            }
            Some(_) => {
                let _ = writeln!(out, "(attendance log is empty)");
            }
            None => {
                let _ = writeln!(out, "(no attendance log loaded, run fetch-log)");
            }
        },
    }

    if let Some(text) = notification_line(&snapshot.notification) {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "{text}");
    }
    if snapshot.busy {
        let _ = writeln!(out, "Working...");
    }
    out
}
