//! Reply bodies and their classification.
//!
//! JSON operations answer `{"message": ...}` on success and
//! `{"error": ...}` on failure, usually paired with a non-2xx status. The
//! log download answers raw text either way.

use serde::{Deserialize, Serialize};

/// Successful JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReply {
    pub message: String,
}

/// Failed JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

/// Lenient view over either reply shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReplyBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Outcome of a backend call once status and body have been looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    /// The backend reported success. `message` is its text, if any.
    Accepted { message: Option<String> },
    /// The backend answered but signalled failure. `message` is the
    /// backend-provided error text, if it sent one.
    Rejected { status: u16, message: Option<String> },
}

impl BackendReply {
    /// Classify a JSON operation reply.
    ///
    /// An `error` field wins over the status code: a 2xx body carrying
    /// `error` is still a rejection.
    pub fn from_json(status: u16, body: &str) -> Self {
        let parsed: ReplyBody = serde_json::from_str(body).unwrap_or_default();
        let error = parsed.error.filter(|e| !e.trim().is_empty());
        let message = parsed.message.filter(|m| !m.trim().is_empty());

        if is_success(status) && error.is_none() {
            return Self::Accepted { message };
        }

        Self::Rejected {
            status,
            message: error,
        }
    }

    /// Classify a raw-text reply (the attendance log).
    pub fn from_text(status: u16, body: &str) -> Self {
        if is_success(status) {
            Self::Accepted {
                message: Some(body.to_string()),
            }
        } else {
            let trimmed = body.trim();
            Self::Rejected {
                status,
                message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
