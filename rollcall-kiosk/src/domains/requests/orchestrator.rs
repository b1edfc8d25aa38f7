//! Request orchestrator
//!
//! Every backend operation runs in the same envelope: raise busy, announce
//! progress, issue exactly one request, announce the outcome, lower busy.
//! Nothing is retried; the user re-triggers the action.

use std::sync::Arc;

use rollcall_model::Operation;

use crate::domains::feedback::NotificationChannel;
use crate::domains::session::state_types::{Mode, SessionStore};
use crate::domains::session::transitions::ModeTransitions;
use crate::infra::api_client::ApiError;
use crate::infra::services::RecognitionService;

use super::busy::{BusyFlag, BusyGuard};
use super::errors::OperationError;

pub const NO_PHOTO_CAPTURED: &str = "No photo captured. Capture a photo first.";

fn progress_text(operation: Operation) -> &'static str {
    match operation {
        Operation::Register => "Registering face...",
        Operation::Scan => "Scanning image...",
        Operation::Train => "Training model...",
        Operation::FetchLog => "Fetching attendance log...",
    }
}

fn fallback_success_text(operation: Operation) -> &'static str {
    match operation {
        Operation::Register => "Registration successful.",
        Operation::Scan => "Scan complete.",
        Operation::Train => "Model training complete.",
        Operation::FetchLog => "Attendance log loaded.",
    }
}

/// User-facing text for a failed request. Network failures are prefixed so
/// they read differently from anything the backend says.
pub fn failure_text(operation: Operation, err: &ApiError) -> String {
    match err {
        ApiError::Transport(message) => format!("Network error: {message}"),
        ApiError::Rejected {
            message: Some(message),
            ..
        } => message.clone(),
        ApiError::Rejected {
            status,
            status_text,
            message: None,
        } => format!("{operation} failed: {status} {status_text}"),
        ApiError::Request(message) => format!("{operation} failed: {message}"),
    }
}

#[derive(Clone)]
pub struct RequestOrchestrator {
    service: Arc<dyn RecognitionService>,
    store: SessionStore,
    notifications: NotificationChannel,
    transitions: Arc<ModeTransitions>,
    busy: BusyFlag,
}

impl std::fmt::Debug for RequestOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOrchestrator")
            .field("service", &"RecognitionService(..)")
            .field("busy", &self.busy)
            .finish()
    }
}

impl RequestOrchestrator {
    pub fn new(
        service: Arc<dyn RecognitionService>,
        store: SessionStore,
        notifications: NotificationChannel,
        transitions: Arc<ModeTransitions>,
        busy: BusyFlag,
    ) -> Self {
        Self {
            service,
            store,
            notifications,
            transitions,
            busy,
        }
    }

    pub fn busy(&self) -> &BusyFlag {
        &self.busy
    }

    fn begin(&self, operation: Operation) -> Result<BusyGuard, OperationError> {
        let guard = self.busy.begin(operation).inspect_err(|err| {
            if let OperationError::Busy { in_flight, .. } = err {
                self.notifications
                    .error(format!("{in_flight} is still in progress. Please wait."));
            }
        })?;
        log::info!("[Orchestrator] {} started", operation);
        self.notifications.info(progress_text(operation));
        Ok(guard)
    }

    fn succeed(&self, operation: Operation, message: Option<String>) -> String {
        let text = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback_success_text(operation).to_string());
        log::info!("[Orchestrator] {} succeeded: {}", operation, text);
        self.notifications.success(text.clone());
        text
    }

    fn fail(&self, operation: Operation, err: ApiError) -> OperationError {
        log::error!("[Orchestrator] {} failed: {:?}", operation, err);
        self.notifications.error(failure_text(operation, &err));
        OperationError::Api {
            operation,
            source: err,
        }
    }

    /// Submit the registration draft. Clears the draft on success only.
    pub async fn register(&self) -> Result<String, OperationError> {
        let operation = Operation::Register;
        let form = match self.store.with_state(|s| s.draft.to_form()) {
            Ok(form) => form,
            Err(missing) => {
                self.notifications.error(format!(
                    "Missing required field(s): {}",
                    missing.join(", ")
                ));
                return Err(OperationError::Validation { operation, missing });
            }
        };

        let _guard = self.begin(operation)?;
        match self.service.register_face(form).await {
            Ok(message) => {
                self.store.update(|s| s.draft = Default::default());
                Ok(self.succeed(operation, message))
            }
            Err(err) => Err(self.fail(operation, err)),
        }
    }

    /// Submit the captured frame. The frame is consumed whatever the outcome.
    pub async fn scan(&self) -> Result<String, OperationError> {
        let operation = Operation::Scan;
        let Some(frame) = self.store.with_state(|s| s.captured_frame.clone()) else {
            self.notifications.error(NO_PHOTO_CAPTURED);
            return Err(OperationError::Validation {
                operation,
                missing: vec!["photo"],
            });
        };

        let _guard = self.begin(operation)?;
        let result = self.service.scan_image(frame.to_payload()).await;
        self.store.update(|s| s.captured_frame = None);

        match result {
            Ok(message) => Ok(self.succeed(operation, message)),
            Err(err) => Err(self.fail(operation, err)),
        }
    }

    pub async fn train(&self) -> Result<String, OperationError> {
        let operation = Operation::Train;
        let _guard = self.begin(operation)?;
        match self.service.train_model().await {
            Ok(message) => Ok(self.succeed(operation, message)),
            Err(err) => Err(self.fail(operation, err)),
        }
    }

    /// Download the attendance log and switch to the Log screen.
    pub async fn fetch_log(&self) -> Result<String, OperationError> {
        let operation = Operation::FetchLog;
        let _guard = self.begin(operation)?;
        match self.service.fetch_attendance_log().await {
            Ok(text) => {
                log::debug!("[Orchestrator] Attendance log is {} bytes", text.len());
                self.store.update(|s| s.attendance_log = Some(text.clone()));
                self.transitions.set_mode(Mode::Log).await;
                self.succeed(operation, None);
                Ok(text)
            }
            Err(err) => Err(self.fail(operation, err)),
        }
    }
}
