//! Configuration file support.
//!
//! This module reads the chart, glucose and time preferences from a TOML file.
//!
//! ```toml
//! [chart]
//! active_domain = "1 week"
//! extent_size = 7
//! extent_policy = "visible"
//!
//! [chart.active_days]
//! saturday = false
//! sunday = false
//!
//! [bg]
//! units = "mmol/L"
//!
//! [time]
//! timezone_aware = true
//! timezone_name = "Europe/Paris"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::prefs::{BgPrefs, ChartPrefs, TimePrefs};
use crate::error::{ErrorContext, ModalError, ModalResult};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "MODAL_DAY_CONFIG";

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModalConfig {
    #[serde(default)]
    pub chart: ChartPrefs,
    #[serde(default)]
    pub bg: BgPrefs,
    #[serde(default)]
    pub time: TimePrefs,
}

impl ModalConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ModalResult<Self> {
        let config: ModalConfig = toml::from_str(content).map_err(|e| {
            ModalError::configuration_with_context(
                format!("Failed to parse config: {}", e),
                ErrorContext::new("parse_config"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ModalConfig)` if successful
    /// * `Err(ModalError::Configuration)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> ModalResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ModalError::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new("read_config").with_details(path.display().to_string()),
            )
        })?;
        log::debug!("loading modal-day configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `modal_day.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> ModalResult<Self> {
        let search_paths = vec![
            PathBuf::from("modal_day.toml"),
            PathBuf::from("rust_backend/modal_day.toml"),
            PathBuf::from("../modal_day.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ModalError::configuration(
            "No modal_day.toml found in standard locations",
        ))
    }

    /// Load from the file named by `MODAL_DAY_CONFIG`, else the default
    /// location, else built-in defaults.
    pub fn from_env_or_default() -> ModalResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::from_file(path.trim());
            }
        }
        match Self::from_default_location() {
            Ok(config) => Ok(config),
            Err(ModalError::Configuration { ref message, .. })
                if message.starts_with("No modal_day.toml") =>
            {
                log::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> ModalResult<()> {
        self.chart.validate()?;
        self.bg.classes().validate()?;
        self.time.timezone()?;
        Ok(())
    }
}
