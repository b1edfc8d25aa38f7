//! Mode transitions
//!
//! The only place the camera is acquired or released in response to a mode
//! change. Transitions hold the media lock end to end, so a second
//! `set_mode` waits for the first one to finish before it looks at the
//! camera.

use crate::domains::media::{MediaSession, ReleasedSession, SharedMediaManager};

use super::state_types::{MediaStatus, Mode, SessionStore};

/// What the camera did during a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraOutcome {
    Untouched,
    Started(MediaSession),
    /// Acquisition was attempted and failed; the error was already shown.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub from: Mode,
    pub to: Mode,
    pub released: Option<ReleasedSession>,
    pub camera: CameraOutcome,
}

#[derive(Debug, Clone)]
pub struct ModeTransitions {
    store: SessionStore,
    media: SharedMediaManager,
}

impl ModeTransitions {
    pub fn new(store: SessionStore, media: SharedMediaManager) -> Self {
        Self { store, media }
    }

    pub fn media(&self) -> &SharedMediaManager {
        &self.media
    }

    /// Switch to `target`.
    ///
    /// Leaving Scan releases the camera and drops any captured frame.
    /// Entering Scan acquires it. Scan to Scan does both, in that order.
    /// The mode is committed before acquisition so the Scan screen shows
    /// even when the camera turns out to be unavailable.
    pub async fn set_mode(&self, target: Mode) -> ModeChange {
        let mut media = self.media.lock().await;
        let from = self.store.with_state(|s| s.mode);

        let released = if from == Mode::Scan {
            let released = media.release();
            self.store.update(|s| {
                s.captured_frame = None;
                s.media = MediaStatus::default();
            });
            released
        } else {
            None
        };

        self.store.update(|s| s.mode = target);
        log::debug!("[Session] Mode {} -> {}", from, target);

        let camera = if target == Mode::Scan {
            match media.acquire().await {
                Ok(session) => {
                    self.store.update(|s| {
                        s.media = MediaStatus {
                            session_id: Some(session.id),
                            dimensions: session.dimensions,
                        };
                    });
                    CameraOutcome::Started(session)
                }
                Err(err) => {
                    log::warn!("[Session] Scan screen without camera: {}", err);
                    CameraOutcome::Unavailable
                }
            }
        } else {
            CameraOutcome::Untouched
        };

        ModeChange {
            from,
            to: target,
            released,
            camera,
        }
    }

    /// Release the camera regardless of mode and park the session on Home.
    /// Used on teardown.
    pub async fn shutdown(&self) -> Option<ReleasedSession> {
        let released = self.media.lock().await.release();
        self.store.update(|s| {
            s.captured_frame = None;
            s.media = MediaStatus::default();
            s.mode = Mode::Home;
        });
        released
    }
}
