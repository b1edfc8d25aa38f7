use std::collections::HashMap;
use std::io::Write;

use rollcall_config::loader::{ENV_CAMERA_IMAGE, ENV_CONFIG_PATH};
use rollcall_config::{BusyPolicy, ConfigLoadError, ConfigLoader, ConfigSource};

fn loader_with(vars: HashMap<String, String>) -> ConfigLoader {
    ConfigLoader::new()
        .with_env(move |key| vars.get(key).cloned())
        .with_default_file(None)
}

#[test]
fn explicit_toml_path_wins_over_default_file() {
    let dir = tempfile::tempdir().unwrap();

    let explicit = dir.path().join("kiosk.toml");
    std::fs::write(
        &explicit,
        r#"
backend_url = "http://192.168.1.20:5000"
busy_policy = "cooperative"
request_timeout_secs = 0

[camera]
still_image = "/srv/kiosk/frame.png"
"#,
    )
    .unwrap();

    let fallback = dir.path().join("config.toml");
    std::fs::write(&fallback, "backend_url = \"http://unused:1\"").unwrap();

    let vars = HashMap::from([(
        ENV_CONFIG_PATH.to_string(),
        explicit.display().to_string(),
    )]);
    let load = loader_with(vars)
        .with_default_file(Some(fallback))
        .load()
        .unwrap();

    assert_eq!(load.source, ConfigSource::EnvPath(explicit));
    assert_eq!(load.config.backend_url, "http://192.168.1.20:5000");
    assert_eq!(load.config.busy_policy, BusyPolicy::Cooperative);
    assert_eq!(load.config.request_timeout(), None);
    assert_eq!(
        load.config.camera.still_image.as_deref(),
        Some(std::path::Path::new("/srv/kiosk/frame.png"))
    );
}

#[test]
fn default_file_accepts_json_content() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"notification_ttl_ms": 2500}}"#).unwrap();

    let vars = HashMap::from([(
        ENV_CAMERA_IMAGE.to_string(),
        "/tmp/face.jpg".to_string(),
    )]);
    let load = loader_with(vars)
        .with_default_file(Some(file.path().to_path_buf()))
        .load()
        .unwrap();

    assert_eq!(load.source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(load.config.notification_ttl_ms, 2500);
    assert_eq!(load.overrides, vec![ENV_CAMERA_IMAGE]);
}

#[test]
fn missing_explicit_file_is_a_read_error() {
    let vars = HashMap::from([(
        ENV_CONFIG_PATH.to_string(),
        "/definitely/not/here.toml".to_string(),
    )]);
    let err = loader_with(vars).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::Read { .. }), "{err:?}");
}

#[test]
fn invalid_values_fail_validation_after_merge() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "jpeg_quality = 150").unwrap();

    let vars =
        HashMap::from([(ENV_CONFIG_PATH.to_string(), path.display().to_string())]);
    let err = loader_with(vars).load().unwrap_err();
    assert!(matches!(err, ConfigLoadError::InvalidJpegQuality(150)));
}
