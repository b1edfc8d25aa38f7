//! Guard rails applied after loading.

use url::Url;

use crate::loader::error::ConfigLoadError;
use crate::models::KioskConfig;

pub fn validate(config: &KioskConfig) -> Result<(), ConfigLoadError> {
    let raw = config.backend_base();
    // A bare "host:port" means plain http; the HTTP client adds the scheme.
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    let parsed = Url::parse(&candidate).map_err(|source| {
        ConfigLoadError::InvalidBackendUrl {
            value: raw.to_string(),
            source,
        }
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigLoadError::UnsupportedScheme(raw.to_string()));
    }

    if !(1..=100).contains(&config.jpeg_quality) {
        return Err(ConfigLoadError::InvalidJpegQuality(config.jpeg_quality));
    }

    if config.notification_ttl_ms == 0 {
        return Err(ConfigLoadError::ZeroNotificationTtl);
    }

    Ok(())
}
