use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use rollcall_config::{ConfigLoad, ConfigLoader, ConfigSource, KioskConfig};

#[cfg(not(feature = "webcam"))]
use crate::domains::media::DeviceError;
use crate::domains::media::MediaDevices;
use crate::domains::session::{ControllerSettings, SessionController};
use crate::infra::api_client::ApiClient;
use crate::infra::devices::StillImageDevices;
#[cfg(feature = "webcam")]
use crate::infra::devices::WebcamDevices;
use crate::infra::services::{RecognitionApiAdapter, RecognitionService};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub kiosk: KioskConfig,
    pub source: ConfigSource,
}

impl AppConfig {
    pub fn new(kiosk: KioskConfig) -> Self {
        Self {
            kiosk,
            source: ConfigSource::Default,
        }
    }

    /// Load `.env`, config files and environment overrides.
    pub fn from_environment() -> anyhow::Result<Self> {
        let ConfigLoad {
            config,
            source,
            overrides,
        } = ConfigLoader::new()
            .load()
            .context("failed to load kiosk configuration")?;

        log::info!("[Config] Loaded from {:?}", source);
        if !overrides.is_empty() {
            log::info!("[Config] Environment overrides: {}", overrides.join(", "));
        }

        Ok(Self {
            kiosk: config,
            source,
        })
    }

    pub fn backend_url(&self) -> &str {
        self.kiosk.backend_base()
    }
}

/// Which camera the kiosk drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraChoice {
    /// A fixed picture stands in for the live feed.
    StillImage(PathBuf),
    /// The system webcam at this index.
    Webcam(u32),
}

impl From<&KioskConfig> for CameraChoice {
    fn from(config: &KioskConfig) -> Self {
        match &config.camera.still_image {
            Some(path) => Self::StillImage(path.clone()),
            None => Self::Webcam(config.camera.index),
        }
    }
}

/// Camera port for the configured source. The webcam is the default; a
/// configured still image replaces it.
pub fn media_devices(config: &KioskConfig) -> Arc<dyn MediaDevices> {
    match CameraChoice::from(config) {
        CameraChoice::StillImage(path) => {
            log::info!("[Media] Using still image camera at {}", path.display());
            Arc::new(StillImageDevices::from_file(path))
        }
        CameraChoice::Webcam(index) => webcam(index),
    }
}

#[cfg(feature = "webcam")]
fn webcam(index: u32) -> Arc<dyn MediaDevices> {
    log::info!("[Media] Using webcam {}", index);
    Arc::new(WebcamDevices::new(index))
}

#[cfg(not(feature = "webcam"))]
fn webcam(index: u32) -> Arc<dyn MediaDevices> {
    log::warn!(
        "[Media] Built without webcam support; camera {} cannot be opened",
        index
    );
    Arc::new(StillImageDevices::unavailable(DeviceError::not_found(
        "Webcam support is not compiled in",
    )))
}

pub fn recognition_service(
    config: &KioskConfig,
) -> anyhow::Result<Arc<dyn RecognitionService>> {
    let client = ApiClient::new(config.backend_base(), config.request_timeout())
        .context("failed to build the backend HTTP client")?;
    Ok(Arc::new(RecognitionApiAdapter::new(Arc::new(client))))
}

/// Everything the console front end needs.
#[derive(Clone, Debug)]
pub struct Runtime {
    pub controller: SessionController,
    pub service: Arc<dyn RecognitionService>,
}

pub fn runtime_boot(config: &AppConfig) -> anyhow::Result<Runtime> {
    let service = recognition_service(&config.kiosk)?;
    let controller = SessionController::new(
        ControllerSettings::from(&config.kiosk),
        media_devices(&config.kiosk),
        service.clone(),
    );
    Ok(Runtime {
        controller,
        service,
    })
}

/// One liveness check. Never fatal.
pub async fn check_backend(service: &dyn RecognitionService, backend_url: &str) -> bool {
    match service.health().await {
        Ok(banner) => {
            log::info!("[Bootstrap] Backend at {} is up: {}", backend_url, banner.trim());
            true
        }
        Err(err) => {
            log::warn!(
                "[Bootstrap] Backend at {} is not reachable yet: {}",
                backend_url,
                err
            );
            false
        }
    }
}
