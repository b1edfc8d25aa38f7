//! Camera device ports
//!
//! `MediaDevices` hands out streams, `MediaStream` exposes their tracks and
//! decoded frames. Infrastructure provides concrete cameras; tests provide
//! scripted ones.

use async_trait::async_trait;
use image::RgbImage;

use super::errors::DeviceError;

/// What kind of stream to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl MediaConstraints {
    /// Default camera, no microphone.
    pub const VIDEO_ONLY: Self = Self {
        video: true,
        audio: false,
    };

    /// Cameras here have no microphone and never serve audio-only streams.
    pub fn require_video_only(&self) -> Result<(), DeviceError> {
        if !self.video {
            return Err(DeviceError::new(
                "TypeError",
                "At least one of audio and video must be requested",
            ));
        }
        if self.audio {
            return Err(DeviceError::not_found("No microphone available"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Live,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub id: String,
    pub kind: TrackKind,
    pub label: String,
    pub state: TrackState,
}

impl TrackInfo {
    pub fn is_live(&self) -> bool {
        self.state == TrackState::Live
    }
}

#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Open a stream satisfying `constraints`.
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError>;
}

pub trait MediaStream: Send + Sync {
    fn id(&self) -> &str;

    fn tracks(&self) -> Vec<TrackInfo>;

    /// Native size of the decoded video. `None` until a frame is decoded or
    /// after the video track ended.
    fn video_dimensions(&self) -> Option<(u32, u32)>;

    /// Latest decoded video frame.
    fn current_frame(&self) -> Option<RgbImage>;

    /// Stop one track. Returns `false` when the track was unknown or had
    /// already ended.
    fn stop_track(&mut self, track_id: &str) -> bool;
}

impl std::fmt::Debug for dyn MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id())
            .field("tracks", &self.tracks())
            .finish()
    }
}
