//! Configuration loader.
//!
//! Evaluation order:
//! 1) `.env` in the working directory (only fills variables that are unset),
//! 2) `$ROLLCALL_CONFIG_PATH` (TOML or JSON file),
//! 3) `$ROLLCALL_CONFIG_JSON` (inline JSON),
//! 4) `<config dir>/rollcall/config.toml` when it exists,
//! 5) defaults.
//!
//! `$ROLLCALL_BACKEND_URL`, `$ROLLCALL_CAMERA_INDEX` and
//! `$ROLLCALL_CAMERA_IMAGE` are applied on top of whichever source won, then
//! the result is validated.

pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::models::KioskConfig;
use crate::validation::validate;

use error::ConfigLoadError;

pub const ENV_CONFIG_PATH: &str = "ROLLCALL_CONFIG_PATH";
pub const ENV_CONFIG_JSON: &str = "ROLLCALL_CONFIG_JSON";
pub const ENV_BACKEND_URL: &str = "ROLLCALL_BACKEND_URL";
pub const ENV_CAMERA_INDEX: &str = "ROLLCALL_CAMERA_INDEX";
pub const ENV_CAMERA_IMAGE: &str = "ROLLCALL_CAMERA_IMAGE";

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// A validated configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: KioskConfig,
    pub source: ConfigSource,
    /// Environment variables that overrode file/default values.
    pub overrides: Vec<&'static str>,
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct ConfigLoader {
    env: EnvLookup,
    default_file: Option<PathBuf>,
    read_dotenv: bool,
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("env", &"Fn(&str) -> Option<String>")
            .field("default_file", &self.default_file)
            .field("read_dotenv", &self.read_dotenv)
            .finish()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader over the process environment and the platform config dir.
    pub fn new() -> Self {
        Self {
            env: Box::new(|key| std::env::var(key).ok()),
            default_file: dirs::config_dir()
                .map(|dir| dir.join("rollcall").join("config.toml")),
            read_dotenv: true,
        }
    }

    /// Replace the environment lookup. Used by tests and embedders.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self.read_dotenv = false;
        self
    }

    pub fn with_default_file(mut self, path: Option<PathBuf>) -> Self {
        self.default_file = path;
        self
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.trim().is_empty())
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        if self.read_dotenv {
            // A missing .env is the common case, not an error.
            let _ = dotenvy::dotenv();
        }

        let (mut config, source) = self.load_base()?;
        let mut overrides = Vec::new();

        if let Some(url) = self.var(ENV_BACKEND_URL) {
            config.backend_url = url.trim().to_string();
            overrides.push(ENV_BACKEND_URL);
        }
        if let Some(raw) = self.var(ENV_CAMERA_INDEX) {
            let value = raw.trim();
            config.camera.index = value.parse().map_err(|source| {
                ConfigLoadError::InvalidCameraIndex {
                    value: value.to_string(),
                    source,
                }
            })?;
            overrides.push(ENV_CAMERA_INDEX);
        }
        if let Some(path) = self.var(ENV_CAMERA_IMAGE) {
            config.camera.still_image = Some(PathBuf::from(path));
            overrides.push(ENV_CAMERA_IMAGE);
        }

        validate(&config)?;

        Ok(ConfigLoad {
            config,
            source,
            overrides,
        })
    }

    fn load_base(&self) -> Result<(KioskConfig, ConfigSource), ConfigLoadError> {
        if let Some(path_str) = self.var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(path_str);
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = self.var(ENV_CONFIG_JSON) {
            let config = serde_json::from_str(&raw)
                .map_err(ConfigLoadError::InlineJson)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.default_file.as_ref().filter(|p| p.exists()) {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::File(path.clone())));
        }

        Ok((KioskConfig::default(), ConfigSource::Default))
    }
}

pub fn load_from_file(path: &Path) -> Result<KioskConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_from_str(&contents, &path.display().to_string())
}

/// Parse TOML first, then JSON for convenience.
pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> Result<KioskConfig, ConfigLoadError> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            ConfigLoadError::Parse {
                origin: origin.to_string(),
                toml: toml_err.to_string(),
                json: json_err.to_string(),
            }
        })
    })
}
