//! Media device manager
//!
//! Sole owner of the camera. At most one media session exists at a time;
//! release is idempotent and also runs on drop so the camera cannot outlive
//! the manager.

use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use uuid::Uuid;

use crate::domains::feedback::NotificationChannel;

use super::devices::{MediaConstraints, MediaDevices};
use super::errors::{CaptureError, MediaError};
use super::preview::PreviewSurface;

pub const WEBCAM_READY: &str = "Webcam ready";

/// A live binding between the camera and the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSession {
    pub id: Uuid,
    pub stream_id: String,
    pub dimensions: Option<(u32, u32)>,
    pub started_at: Instant,
}

/// Outcome of a release that actually tore a session down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedSession {
    pub id: Uuid,
    pub tracks_stopped: usize,
}

/// A raw frame pulled from the preview, tagged with its session.
#[derive(Debug, Clone)]
pub struct GrabbedFrame {
    pub session_id: Uuid,
    pub image: RgbImage,
}

pub struct MediaDeviceManager {
    devices: Arc<dyn MediaDevices>,
    notifications: NotificationChannel,
    preview: PreviewSurface,
    session: Option<MediaSession>,
}

impl std::fmt::Debug for MediaDeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDeviceManager")
            .field("devices", &"MediaDevices(..)")
            .field("preview", &self.preview)
            .field("session", &self.session)
            .finish()
    }
}

impl MediaDeviceManager {
    pub fn new(
        devices: Arc<dyn MediaDevices>,
        notifications: NotificationChannel,
    ) -> Self {
        Self {
            devices,
            notifications,
            preview: PreviewSurface::new(),
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&MediaSession> {
        self.session.as_ref()
    }

    /// Open the default camera (video only) and start the preview.
    pub async fn acquire(&mut self) -> Result<MediaSession, MediaError> {
        if let Some(session) = &self.session {
            log::warn!(
                "[Media] Acquire requested while session {} is active; keeping it",
                session.id
            );
            return Err(MediaError::AlreadyActive);
        }

        log::debug!("[Media] Requesting default camera");
        let stream = match self
            .devices
            .get_user_media(MediaConstraints::VIDEO_ONLY)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                log::error!("[Media] Camera unavailable: {}", err);
                self.notifications
                    .error(format!("Error accessing webcam: {err}"));
                return Err(err.into());
            }
        };

        let stream_id = stream.id().to_string();
        if let Some(mut stale) = self.preview.attach(stream) {
            // Unreachable while `session` tracks the surface, but never leak
            // a stream if it happens.
            for track in stale.tracks() {
                stale.stop_track(&track.id);
            }
        }
        self.preview.play();

        let session = MediaSession {
            id: Uuid::new_v4(),
            stream_id,
            dimensions: self.preview.decoded_dimensions(),
            started_at: Instant::now(),
        };
        log::info!(
            "[Media] Session {} started on stream {} ({:?})",
            session.id,
            session.stream_id,
            session.dimensions
        );
        self.session = Some(session.clone());
        self.notifications.info(WEBCAM_READY);
        Ok(session)
    }

    /// Stop every track and detach the preview. No-op without a session.
    pub fn release(&mut self) -> Option<ReleasedSession> {
        let session = self.session.take()?;
        let tracks_stopped = self.preview.detach();
        log::info!(
            "[Media] Session {} released after {:?}, {} track(s) stopped",
            session.id,
            session.started_at.elapsed(),
            tracks_stopped
        );
        Some(ReleasedSession {
            id: session.id,
            tracks_stopped,
        })
    }

    /// Pull the current preview frame at native resolution.
    pub fn grab_frame(&self) -> Result<GrabbedFrame, CaptureError> {
        let session = self.session.as_ref().ok_or(CaptureError::NotReady)?;
        let image = self.preview.draw_frame().ok_or(CaptureError::NotReady)?;
        Ok(GrabbedFrame {
            session_id: session.id,
            image,
        })
    }
}

impl Drop for MediaDeviceManager {
    fn drop(&mut self) {
        if self.release().is_some() {
            log::warn!("[Media] Camera released on drop");
        }
    }
}
