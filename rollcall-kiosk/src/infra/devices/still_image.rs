//! A camera that shows one picture
//!
//! Serves a fixed raster as a single live video track. The console binary
//! points it at a file (`camera.still_image`) for demos and camera-less
//! machines; tests hand it a raster directly or a scripted failure.

use std::path::PathBuf;

use async_trait::async_trait;
use image::RgbImage;
use uuid::Uuid;

use crate::domains::media::{
    DeviceError, MediaConstraints, MediaDevices, MediaStream, TrackInfo, TrackKind,
    TrackState,
};

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Frame(RgbImage),
    Unavailable(DeviceError),
}

#[derive(Debug, Clone)]
pub struct StillImageDevices {
    source: Source,
}

impl StillImageDevices {
    /// Decode `path` on every acquisition.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    pub fn from_frame(frame: RgbImage) -> Self {
        Self {
            source: Source::Frame(frame),
        }
    }

    /// Every acquisition fails with `error`.
    pub fn unavailable(error: DeviceError) -> Self {
        Self {
            source: Source::Unavailable(error),
        }
    }

    /// No camera configured.
    pub fn none() -> Self {
        Self::unavailable(DeviceError::not_found("Requested device not found"))
    }
}

#[async_trait]
impl MediaDevices for StillImageDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        constraints.require_video_only()?;

        let frame = match &self.source {
            Source::Frame(frame) => frame.clone(),
            Source::Unavailable(err) => return Err(err.clone()),
            Source::File(path) => {
                let path = path.clone();
                let decoded = tokio::task::spawn_blocking(move || image::open(&path))
                    .await
                    .map_err(|err| DeviceError::not_readable(err.to_string()))?;
                decoded
                    .map_err(|err| DeviceError::not_readable(err.to_string()))?
                    .to_rgb8()
            }
        };

        Ok(Box::new(StillImageStream::new(frame)))
    }
}

/// One-track stream over a fixed raster.
#[derive(Debug)]
pub struct StillImageStream {
    id: String,
    track: TrackInfo,
    frame: RgbImage,
}

impl StillImageStream {
    pub fn new(frame: RgbImage) -> Self {
        let id = Uuid::new_v4().to_string();
        let track = TrackInfo {
            id: format!("{id}-video"),
            kind: TrackKind::Video,
            label: "Still image camera".to_string(),
            state: TrackState::Live,
        };
        Self { id, track, frame }
    }
}

impl MediaStream for StillImageStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![self.track.clone()]
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        self.track.is_live().then(|| self.frame.dimensions())
    }

    fn current_frame(&self) -> Option<RgbImage> {
        self.track.is_live().then(|| self.frame.clone())
    }

    fn stop_track(&mut self, track_id: &str) -> bool {
        if track_id != self.track.id || !self.track.is_live() {
            return false;
        }
        self.track.state = TrackState::Ended;
        true
    }
}
