//! Message dispatch
//!
//! Maps a [`SessionMessage`] onto the controller entry point that handles it.
//! Failures have already been shown as notifications by the time they come
//! back here; the returned [`UpdateOutcome`] only lets callers log or test
//! what happened.

use super::controller::SessionController;
use super::messages::SessionMessage;
use super::transitions::ModeChange;

#[derive(Debug)]
pub enum UpdateOutcome {
    Navigated(ModeChange),
    DraftEdited,
    Captured,
    Dismissed,
    Completed(String),
    Failed(String),
}

impl UpdateOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

fn settle<T, E: std::fmt::Display>(
    result: Result<T, E>,
    on_ok: impl FnOnce(T) -> UpdateOutcome,
) -> UpdateOutcome {
    match result {
        Ok(value) => on_ok(value),
        Err(err) => UpdateOutcome::Failed(err.to_string()),
    }
}

pub async fn update(controller: &SessionController, message: SessionMessage) -> UpdateOutcome {
    log::trace!("[Session] Handling {}", message.name());

    match message {
        SessionMessage::Navigate(mode) => {
            UpdateOutcome::Navigated(controller.set_mode(mode).await)
        }

        SessionMessage::UpdateName(name) => {
            controller.set_name(name);
            UpdateOutcome::DraftEdited
        }
        SessionMessage::UpdateRollNo(roll_no) => {
            controller.set_roll_no(roll_no);
            UpdateOutcome::DraftEdited
        }
        SessionMessage::PickImage(path) => settle(controller.load_image(&path).await, |_| {
            UpdateOutcome::DraftEdited
        }),
        SessionMessage::ClearImage => {
            controller.clear_image();
            UpdateOutcome::DraftEdited
        }

        SessionMessage::Capture => {
            settle(controller.capture().await, |_| UpdateOutcome::Captured)
        }

        SessionMessage::Register => {
            settle(controller.register().await, UpdateOutcome::Completed)
        }
        SessionMessage::Scan => settle(controller.scan().await, UpdateOutcome::Completed),
        SessionMessage::Train => settle(controller.train().await, UpdateOutcome::Completed),
        SessionMessage::FetchLog => {
            settle(controller.fetch_log().await, |_| {
                UpdateOutcome::Completed("Attendance log loaded".to_string())
            })
        }

        SessionMessage::DismissNotification => {
            controller.dismiss_notification();
            UpdateOutcome::Dismissed
        }
    }
}
