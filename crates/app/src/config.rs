//! Application configuration
//!
//! Loaded from `csquare.toml` in the platform config directory (or an
//! explicit `--config` path). Every field has a default, and a couple of
//! environment variables override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use csquare_core::{CarouselConfig, ToastSource, ToastTiming};
use csquare_net::{ClientConfig, DEFAULT_BASE_URL};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, Result};

pub const ENV_API_URL: &str = "CSQUARE_API_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "CSQUARE_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSection,
    pub carousel: CarouselConfig,
    pub toast: ToastSection,
    pub viewport: ViewportSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Toast policy; unset delays fall back to the policy's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastSection {
    pub source: ToastSource,
    pub show_delay_ms: Option<u64>,
    pub hide_delay_ms: Option<u64>,
}

impl ToastSection {
    pub fn timing(&self) -> ToastTiming {
        let defaults = self.source.default_timing();
        ToastTiming {
            show_delay_ms: self.show_delay_ms.unwrap_or(defaults.show_delay_ms),
            hide_delay_ms: self.hide_delay_ms.unwrap_or(defaults.hide_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSection {
    /// Width the console renders carousels for
    pub width: u32,
}

impl Default for ViewportSection {
    fn default() -> Self {
        Self { width: 1280 }
    }
}

impl AppConfig {
    /// `<config dir>/csquare.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "csquare", "csquare")
            .map(|dirs| dirs.config_dir().join("csquare.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config and apply environment overrides
    ///
    /// An explicit path must exist. The default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!(path = %path.display(), "Loading config");
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    info!(path = %path.display(), "Loading config");
                    Self::from_toml(&std::fs::read_to_string(&path)?)?
                }
                None => {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            self.api.request_timeout_ms = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a number of milliseconds, got {:?}", ENV_REQUEST_TIMEOUT_MS, raw))
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.request_timeout_ms)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout: self.request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.carousel.slide_interval, Duration::from_millis(4000));
    }

    #[test]
    fn test_sections_parse() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "http://localhost:5000/api"

            [carousel]
            auto_slide = false
            slide_interval_ms = 5000
            items_per_view = { mobile = 1, tablet = 2, desktop = 4 }

            [toast]
            source = "first_upcoming_event"
            hide_delay_ms = 20000

            [viewport]
            width = 800
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.request_timeout_ms, 10_000);
        assert!(!config.carousel.auto_slide);
        assert!(config.carousel.show_dots);
        assert_eq!(config.carousel.slide_interval, Duration::from_millis(5000));
        assert_eq!(config.carousel.items_per_view.desktop, 4);
        assert_eq!(
            config.toast.timing(),
            ToastTiming {
                show_delay_ms: 3000,
                hide_delay_ms: 20000
            }
        );
        assert_eq!(config.viewport.width, 800);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, " http://10.0.0.2/api "),
            (ENV_REQUEST_TIMEOUT_MS, "2500"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.client_config().base_url, "http://10.0.0.2/api");
        assert_eq!(config.client_config().request_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_bad_timeout_override_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_REQUEST_TIMEOUT_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_explicit_path_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csquare.toml");
        std::fs::write(&path, "[viewport]\nwidth = 600\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.viewport.width, 600);

        assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[api\nbase_url = 1"),
            Err(AppError::ConfigParse(_))
        ));
    }
}
