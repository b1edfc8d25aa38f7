//! Session workflow controller
//!
//! Owns the session state and wires the domains together. Every mutation the
//! presentation layer can cause has a named entry point here.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rollcall_config::{BusyPolicy, KioskConfig};
use rollcall_model::ImagePayload;
use tokio::sync::{Mutex, watch};

use crate::domains::feedback::{DEFAULT_NOTIFICATION_TTL, NotificationChannel};
use crate::domains::media::capture::DEFAULT_JPEG_QUALITY;
use crate::domains::media::{
    CaptureError, CapturePipeline, MediaDeviceManager, MediaDevices, ReleasedSession,
};
use crate::domains::requests::{BusyFlag, OperationError, RequestOrchestrator};
use crate::infra::services::RecognitionService;

use super::state_types::{CapturedFrame, Mode, SessionSnapshot, SessionStore, image_from_path};
use super::transitions::{ModeChange, ModeTransitions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Shown in logs only; the service owns the actual connection.
    pub backend_url: String,
    pub notification_ttl: Duration,
    pub jpeg_quality: u8,
    pub busy_policy: BusyPolicy,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            busy_policy: BusyPolicy::default(),
        }
    }
}

impl From<&KioskConfig> for ControllerSettings {
    fn from(config: &KioskConfig) -> Self {
        Self {
            backend_url: config.backend_url.clone(),
            notification_ttl: config.notification_ttl(),
            jpeg_quality: config.jpeg_quality,
            busy_policy: config.busy_policy,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionController {
    settings: ControllerSettings,
    store: SessionStore,
    notifications: NotificationChannel,
    transitions: Arc<ModeTransitions>,
    capture: CapturePipeline,
    orchestrator: RequestOrchestrator,
}

impl SessionController {
    pub fn new(
        settings: ControllerSettings,
        devices: Arc<dyn MediaDevices>,
        service: Arc<dyn RecognitionService>,
    ) -> Self {
        let store = SessionStore::new();
        let notifications = NotificationChannel::new(store.clone(), settings.notification_ttl);
        let media = Arc::new(Mutex::new(MediaDeviceManager::new(
            devices,
            notifications.clone(),
        )));
        let transitions = Arc::new(ModeTransitions::new(store.clone(), media.clone()));
        let capture = CapturePipeline::new(
            media,
            store.clone(),
            notifications.clone(),
            settings.jpeg_quality,
        );
        let orchestrator = RequestOrchestrator::new(
            service,
            store.clone(),
            notifications.clone(),
            transitions.clone(),
            BusyFlag::new(store.clone(), settings.busy_policy),
        );

        Self {
            settings,
            store,
            notifications,
            transitions,
            capture,
            orchestrator,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    /// Enter Home through the regular transition path, so a camera left
    /// live by an earlier Scan screen is released first.
    pub async fn start(&self) -> ModeChange {
        log::info!(
            "[Session] Starting against {} (busy policy {:?})",
            self.settings.backend_url,
            self.settings.busy_policy
        );
        let change = self.transitions.set_mode(Mode::Home).await;
        self.store.update(|s| s.started = true);
        change
    }

    /// Release the camera, return to Home and stop the notification timer.
    /// Safe to call more than once.
    pub async fn stop(&self) -> Option<ReleasedSession> {
        let released = self.transitions.shutdown().await;
        self.notifications.cancel_expiry();
        self.store.update(|s| s.started = false);
        log::info!("[Session] Stopped");
        released
    }

    pub async fn set_mode(&self, target: Mode) -> ModeChange {
        self.transitions.set_mode(target).await
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.store.update(|s| s.draft.name = name);
    }

    pub fn set_roll_no(&self, roll_no: impl Into<String>) {
        let roll_no = roll_no.into();
        self.store.update(|s| s.draft.roll_no = roll_no);
    }

    pub fn set_image(&self, image: ImagePayload) {
        log::debug!("[Session] Registration image set: {:?}", image);
        self.store.update(|s| s.draft.image = Some(image));
    }

    /// Read a picture from disk into the draft.
    pub async fn load_image(&self, path: &Path) -> std::io::Result<()> {
        match image_from_path(path).await {
            Ok(image) => {
                self.set_image(image);
                Ok(())
            }
            Err(err) => {
                log::warn!("[Session] Could not read {}: {}", path.display(), err);
                self.notifications
                    .error(format!("Could not read {}: {err}", path.display()));
                Err(err)
            }
        }
    }

    pub fn clear_image(&self) {
        self.store.update(|s| s.draft.image = None);
    }

    pub async fn capture(&self) -> Result<CapturedFrame, CaptureError> {
        self.capture.capture().await
    }

    pub async fn register(&self) -> Result<String, OperationError> {
        self.orchestrator.register().await
    }

    pub async fn scan(&self) -> Result<String, OperationError> {
        self.orchestrator.scan().await
    }

    pub async fn train(&self) -> Result<String, OperationError> {
        self.orchestrator.train().await
    }

    pub async fn fetch_log(&self) -> Result<String, OperationError> {
        self.orchestrator.fetch_log().await
    }

    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.store.subscribe()
    }
}
