//! Configuration models.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Default recognition backend address.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
/// Default notification lifetime.
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 5_000;
/// Default JPEG quality for captured frames (0.9 on a 0..1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How the busy flag treats overlapping operations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    /// Busy is a real single-flight guard; a second operation started while
    /// one is in flight is refused before it reaches the network.
    #[default]
    Exclusive,
    /// Busy is only an indicator. Overlapping operations both run and the
    /// last one to finish decides the final busy/notification state.
    Cooperative,
}

/// Camera source settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Index of the webcam to open (0 is the system default).
    pub index: u32,
    /// Picture served as the live video feed instead of a webcam. Meant for
    /// demos and machines without a camera.
    pub still_image: Option<PathBuf>,
}

/// Top-level kiosk settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Base address of the recognition backend, e.g. `http://10.0.0.5:5000`.
    pub backend_url: String,
    /// How long a status message stays visible when nothing replaces it.
    pub notification_ttl_ms: u64,
    /// JPEG quality (1-100) used when freezing a preview frame.
    pub jpeg_quality: u8,
    /// Per-request HTTP timeout. `None` or `0` waits forever, which keeps the
    /// busy flag raised for as long as the backend stays silent.
    pub request_timeout_secs: Option<u64>,
    pub busy_policy: BusyPolicy,
    pub camera: CameraConfig,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            busy_policy: BusyPolicy::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl KioskConfig {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Backend address without a trailing slash, so routes can be appended.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: KioskConfig =
            toml::from_str("backend_url = \"http://kiosk-backend:5000/\"")
                .unwrap();
        assert_eq!(config.backend_base(), "http://kiosk-backend:5000");
        assert_eq!(config.notification_ttl(), Duration::from_secs(5));
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.busy_policy, BusyPolicy::Exclusive);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = KioskConfig {
            request_timeout_secs: Some(0),
            ..KioskConfig::default()
        };
        assert_eq!(config.request_timeout(), None);
        assert_eq!(
            KioskConfig::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn busy_policy_parses_lowercase() {
        let config: KioskConfig =
            serde_json::from_str(r#"{"busy_policy":"cooperative"}"#).unwrap();
        assert_eq!(config.busy_policy, BusyPolicy::Cooperative);
    }
}
