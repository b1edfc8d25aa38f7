//! Capture pipeline
//!
//! Freezes the live preview into a JPEG still. Encoding runs on the blocking
//! pool. Overlapping captures are not queued: whichever encode finishes last
//! is the frame that stays.

use std::io::Cursor;

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use uuid::Uuid;

use crate::domains::feedback::NotificationChannel;
use crate::domains::session::state_types::{CapturedFrame, SessionStore};

use super::SharedMediaManager;
use super::errors::CaptureError;
use super::manager::GrabbedFrame;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const PHOTO_CAPTURED: &str = "Photo captured";
pub const CAMERA_NOT_READY: &str = "Camera not ready";

/// Encode an RGB raster as JPEG.
pub fn encode_jpeg(image: RgbImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(image).write_with_encoder(encoder)?;
    Ok(buf.into_inner())
}

#[derive(Clone, Debug)]
pub struct CapturePipeline {
    media: SharedMediaManager,
    store: SessionStore,
    notifications: NotificationChannel,
    quality: u8,
}

impl CapturePipeline {
    pub fn new(
        media: SharedMediaManager,
        store: SessionStore,
        notifications: NotificationChannel,
        quality: u8,
    ) -> Self {
        Self {
            media,
            store,
            notifications,
            quality,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Grab, encode and store one frame.
    pub async fn capture(&self) -> Result<CapturedFrame, CaptureError> {
        let grabbed = {
            let media = self.media.lock().await;
            media.grab_frame()
        };
        let grabbed = match grabbed {
            Ok(grabbed) => grabbed,
            Err(err) => {
                log::warn!("[Capture] {}", err);
                self.notifications.error(CAMERA_NOT_READY);
                return Err(err);
            }
        };

        let frame = match self.encode(grabbed).await {
            Ok(frame) => frame,
            Err(err) => {
                log::error!("[Capture] Encoding failed: {:?}", err);
                self.notifications.error(format!("Capture failed: {err}"));
                return Err(err);
            }
        };

        // The session may have been released while the encode ran; a frame
        // from a dead session must not reappear after the Scan screen left.
        let stored = self.store.update_if(|state| {
            if state.media.session_id != Some(frame.session_id) {
                return false;
            }
            state.captured_frame = Some(frame.clone());
            true
        });

        if !stored {
            log::debug!(
                "[Capture] Dropping frame {} from released session {}",
                frame.id,
                frame.session_id
            );
            return Err(CaptureError::SessionEnded);
        }

        log::info!(
            "[Capture] Stored frame {} ({}x{}, {} bytes)",
            frame.id,
            frame.width,
            frame.height,
            frame.jpeg.len()
        );
        self.notifications.success(PHOTO_CAPTURED);
        Ok(frame)
    }

    async fn encode(&self, grabbed: GrabbedFrame) -> Result<CapturedFrame, CaptureError> {
        let quality = self.quality;
        let GrabbedFrame { session_id, image } = grabbed;
        let (width, height) = image.dimensions();

        let jpeg =
            tokio::task::spawn_blocking(move || encode_jpeg(image, quality)).await??;

        Ok(CapturedFrame {
            id: Uuid::new_v4(),
            session_id,
            width,
            height,
            jpeg,
            captured_at: Utc::now(),
        })
    }
}
