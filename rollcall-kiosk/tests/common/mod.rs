#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use parking_lot::Mutex;
use tokio::sync::Notify;

use rollcall_config::BusyPolicy;
use rollcall_kiosk::domains::media::{
    DeviceError, MediaConstraints, MediaDevices, MediaStream, TrackInfo,
};
use rollcall_kiosk::domains::session::{ControllerSettings, SessionController};
use rollcall_kiosk::infra::api_client::ApiError;
use rollcall_kiosk::infra::devices::StillImageStream;
use rollcall_kiosk::infra::services::{ApiResult, RecognitionService};
use rollcall_model::{ImagePayload, RegisterForm};

/// Camera whose streams report every stopped track back to the test.
#[derive(Debug, Default)]
pub struct FakeCamera {
    pub opened: AtomicUsize,
    pub stopped: Arc<AtomicUsize>,
    pub grabs: Arc<AtomicUsize>,
    failure: Mutex<Option<DeviceError>>,
}

impl FakeCamera {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(error: DeviceError) -> Arc<Self> {
        let camera = Self::default();
        *camera.failure.lock() = Some(error);
        Arc::new(camera)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Frames handed to the capture pipeline so far.
    pub fn grabs(&self) -> usize {
        self.grabs.load(Ordering::SeqCst)
    }

    /// Streams opened and not yet stopped.
    pub fn live(&self) -> usize {
        self.opened() - self.stopped()
    }
}

#[async_trait]
impl MediaDevices for FakeCamera {
    async fn get_user_media(
        &self,
        _constraints: MediaConstraints,
    ) -> Result<Box<dyn MediaStream>, DeviceError> {
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingStream {
            inner: StillImageStream::new(RgbImage::from_pixel(64, 48, Rgb([90, 120, 150]))),
            stopped: self.stopped.clone(),
            grabs: self.grabs.clone(),
        }))
    }
}

#[derive(Debug)]
struct CountingStream {
    inner: StillImageStream,
    stopped: Arc<AtomicUsize>,
    grabs: Arc<AtomicUsize>,
}

impl MediaStream for CountingStream {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.inner.tracks()
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        self.inner.video_dimensions()
    }

    fn current_frame(&self) -> Option<RgbImage> {
        let frame = self.inner.current_frame();
        if frame.is_some() {
            self.grabs.fetch_add(1, Ordering::SeqCst);
        }
        frame
    }

    fn stop_track(&mut self, track_id: &str) -> bool {
        let stopped = self.inner.stop_track(track_id);
        if stopped {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
        stopped
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Health,
    Register { name: String, roll_no: String, image_bytes: usize },
    Scan { file_name: String, mime_type: String, bytes: usize },
    Train,
    FetchLog,
}

type Reply = ApiResult<Option<String>>;

/// Recognition backend that answers from queued replies and records every
/// call. An empty queue answers `Ok(None)`. With a gate, every call waits
/// for `release()` before answering.
#[derive(Debug, Default)]
pub struct ScriptedService {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Reply>>,
    log_text: Mutex<Option<ApiResult<String>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let service = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (service, gate)
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn log(self, log: ApiResult<String>) -> Self {
        *self.log_text.lock() = Some(log);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    async fn answer(&self, call: Call) -> Reply {
        self.calls.lock().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies.lock().pop_front().unwrap_or(Ok(None))
    }
}

#[async_trait]
impl RecognitionService for ScriptedService {
    async fn health(&self) -> ApiResult<String> {
        self.calls.lock().push(Call::Health);
        Ok("Face recognition backend".into())
    }

    async fn register_face(&self, form: RegisterForm) -> ApiResult<Option<String>> {
        self.answer(Call::Register {
            name: form.name,
            roll_no: form.roll_no,
            image_bytes: form.image.len(),
        })
        .await
    }

    async fn scan_image(&self, image: ImagePayload) -> ApiResult<Option<String>> {
        self.answer(Call::Scan {
            file_name: image.file_name.clone(),
            mime_type: image.mime_type.clone(),
            bytes: image.len(),
        })
        .await
    }

    async fn train_model(&self) -> ApiResult<Option<String>> {
        self.answer(Call::Train).await
    }

    async fn fetch_attendance_log(&self) -> ApiResult<String> {
        self.calls.lock().push(Call::FetchLog);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.log_text
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

pub fn rejected(status: u16, message: &str) -> Reply {
    Err(ApiError::rejected(status, Some(message.to_string())))
}

pub fn settings(policy: BusyPolicy) -> ControllerSettings {
    ControllerSettings {
        backend_url: "http://127.0.0.1:5000".into(),
        busy_policy: policy,
        ..ControllerSettings::default()
    }
}

pub async fn controller(
    camera: Arc<FakeCamera>,
    service: Arc<ScriptedService>,
) -> SessionController {
    controller_with(settings(BusyPolicy::Exclusive), camera, service).await
}

pub async fn controller_with(
    settings: ControllerSettings,
    camera: Arc<FakeCamera>,
    service: Arc<ScriptedService>,
) -> SessionController {
    let controller = SessionController::new(settings, camera, service);
    controller.start().await;
    controller
}

pub fn sample_image() -> ImagePayload {
    ImagePayload::jpeg("face.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3])
}
