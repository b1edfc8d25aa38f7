//! Native webcam
//!
//! Every stream owns one worker thread. The worker opens the camera, keeps
//! the latest decoded frame and closes the device once the video track is
//! stopped or the stream is dropped. nokhwa cameras are not `Send`, so the
//! device never leaves that thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::domains::media::{
    DeviceError, MediaConstraints, MediaDevices, MediaStream, TrackInfo, TrackKind,
    TrackState,
};

const READ_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Step of the open/read sequence a camera call failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStage {
    Open,
    Stream,
    Frame,
}

/// Map a camera backend failure onto the `getUserMedia` error names.
pub fn classify_failure(stage: CameraStage, message: &str) -> DeviceError {
    const REFUSED: [&str; 4] = ["permission", "denied", "not authorized", "unauthorized"];
    const ABSENT: [&str; 5] = ["not found", "no such", "no device", "out of range", "invalid index"];

    let lowered = message.to_lowercase();
    if REFUSED.iter().any(|hint| lowered.contains(hint)) {
        return DeviceError::not_allowed(message);
    }
    if stage == CameraStage::Open && ABSENT.iter().any(|hint| lowered.contains(hint)) {
        return DeviceError::not_found(message);
    }
    DeviceError::not_readable(message)
}

/// Opens the system webcam at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebcamDevices {
    index: u32,
}

impl WebcamDevices {
    pub fn new(index: u32) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

#[async_trait]
impl MediaDevices for WebcamDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        constraints.require_video_only()?;

        let shared = Arc::new(Shared::default());
        shared.running.store(true, Ordering::Release);
        let (ready_tx, ready_rx) = oneshot::channel();
        let index = self.index;

        std::thread::Builder::new()
            .name(format!("rollcall-webcam-{index}"))
            .spawn({
                let shared = shared.clone();
                move || run_camera(index, shared, ready_tx)
            })
            .map_err(|err| {
                DeviceError::not_readable(format!("could not start camera worker: {err}"))
            })?;

        let label = match ready_rx.await {
            Ok(Ok(label)) => label,
            Ok(Err(err)) => {
                log::warn!("[Webcam] Camera {} unavailable: {}", index, err);
                return Err(err);
            }
            Err(_) => {
                return Err(DeviceError::not_readable(
                    "camera worker exited before the device opened",
                ));
            }
        };

        Ok(Box::new(WebcamStream::new(label, shared)))
    }
}

#[derive(Default)]
struct Shared {
    running: AtomicBool,
    latest: Mutex<Option<RgbImage>>,
}

fn run_camera(
    index: u32,
    shared: Arc<Shared>,
    ready: oneshot::Sender<Result<String, DeviceError>>,
) {
    let mut camera = match open_camera(index, &shared) {
        Ok(camera) => camera,
        Err(err) => {
            let _ = ready.send(Err(err));
            return;
        }
    };

    let label = camera.info().human_name();
    log::info!("[Webcam] Opened {} ({})", label, camera.camera_format());
    if ready.send(Ok(label)).is_err() {
        // Nobody is waiting for the stream any more.
        shared.running.store(false, Ordering::Release);
    }

    while shared.running.load(Ordering::Acquire) {
        match read_frame(&mut camera) {
            Ok(frame) => *shared.latest.lock() = Some(frame),
            Err(err) => {
                log::warn!("[Webcam] Dropped frame: {}", err);
                std::thread::sleep(READ_RETRY_DELAY);
            }
        }
    }

    if let Err(err) = camera.stop_stream() {
        log::warn!("[Webcam] Closing camera {} failed: {}", index, err);
    }
    log::debug!("[Webcam] Camera {} closed", index);
}

fn open_camera(index: u32, shared: &Shared) -> Result<Camera, DeviceError> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|err| classify_failure(CameraStage::Open, &err.to_string()))?;
    camera
        .open_stream()
        .map_err(|err| classify_failure(CameraStage::Stream, &err.to_string()))?;

    // The preview reports its size as soon as the session starts.
    match read_frame(&mut camera) {
        Ok(frame) => {
            *shared.latest.lock() = Some(frame);
            Ok(camera)
        }
        Err(err) => {
            let _ = camera.stop_stream();
            Err(err)
        }
    }
}

fn read_frame(camera: &mut Camera) -> Result<RgbImage, DeviceError> {
    let buffer = camera
        .frame()
        .map_err(|err| classify_failure(CameraStage::Frame, &err.to_string()))?;
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(|err| classify_failure(CameraStage::Frame, &err.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    RgbImage::from_raw(width, height, decoded.into_raw())
        .ok_or_else(|| DeviceError::not_readable("decoded frame does not match its size"))
}

/// One live video track fed by the camera worker.
pub struct WebcamStream {
    id: String,
    track: TrackInfo,
    shared: Arc<Shared>,
}

impl WebcamStream {
    fn new(label: String, shared: Arc<Shared>) -> Self {
        let id = Uuid::new_v4().to_string();
        let track = TrackInfo {
            id: format!("{id}-video"),
            kind: TrackKind::Video,
            label,
            state: TrackState::Live,
        };
        Self { id, track, shared }
    }
}

impl std::fmt::Debug for WebcamStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebcamStream")
            .field("id", &self.id)
            .field("track", &self.track)
            .field("running", &self.shared.running.load(Ordering::Relaxed))
            .finish()
    }
}

impl MediaStream for WebcamStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        vec![self.track.clone()]
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        if !self.track.is_live() {
            return None;
        }
        self.shared.latest.lock().as_ref().map(RgbImage::dimensions)
    }

    fn current_frame(&self) -> Option<RgbImage> {
        if !self.track.is_live() {
            return None;
        }
        self.shared.latest.lock().clone()
    }

    fn stop_track(&mut self, track_id: &str) -> bool {
        if track_id != self.track.id || !self.track.is_live() {
            return false;
        }
        self.track.state = TrackState::Ended;
        self.shared.running.store(false, Ordering::Release);
        true
    }
}

impl Drop for WebcamStream {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
    }
}
