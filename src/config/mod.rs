// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[generator]` - Regeneration timings and preview image kind
//! - `[export]` - Output directory and raster export resolution floor
//!
//! Theme and QR customization choices are not stored here: they are session
//! state persisted through the key-value store (see [`crate::application::port::storage`]).
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `QRX_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use qrx::config;
//!
//! let (mut config, _warning) = config::load();
//! config.generator.debounce_ms = Some(150);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::qr::ImageKind;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Regeneration behavior of the QR controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// Quiet period after the last change before regenerating (ms).
    #[serde(default = "default_debounce_ms", skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    /// Minimum time the generating state is shown after encoding (ms).
    #[serde(
        default = "default_min_display_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_display_ms: Option<u64>,

    /// Image kind produced for the on-screen preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_format: Option<ImageKind>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_display_ms: default_min_display_ms(),
            preview_format: Some(ImageKind::Raster),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Directory receiving exported files. Defaults to the download directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Smallest side length of exported PNG files.
    #[serde(
        default = "default_min_raster_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_raster_size: Option<u32>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            min_raster_size: default_min_raster_size(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// Regeneration settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Debounce period, clamped to the accepted range.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        let ms = self
            .generator
            .debounce_ms
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
            .min(MAX_DEBOUNCE_MS);
        Duration::from_millis(ms)
    }

    /// Minimum display delay, clamped to the accepted range.
    #[must_use]
    pub fn min_display(&self) -> Duration {
        let ms = self
            .generator
            .min_display_ms
            .unwrap_or(DEFAULT_MIN_DISPLAY_MS)
            .min(MAX_MIN_DISPLAY_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn preview_format(&self) -> ImageKind {
        self.generator.preview_format.unwrap_or_default()
    }

    /// Raster export floor, clamped between the largest preview size and
    /// [`MAX_RASTER_EXPORT_SIZE`].
    #[must_use]
    pub fn min_raster_size(&self) -> u32 {
        self.export
            .min_raster_size
            .unwrap_or(DEFAULT_MIN_RASTER_EXPORT_SIZE)
            .clamp(MAX_QR_SIZE, MAX_RASTER_EXPORT_SIZE)
    }

    /// Directory receiving exported files.
    ///
    /// Falls back to the platform download directory, then the current directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_debounce_ms() -> Option<u64> {
    Some(DEFAULT_DEBOUNCE_MS)
}

fn default_min_display_ms() -> Option<u64> {
    Some(DEFAULT_MIN_DISPLAY_MS)
}

fn default_min_raster_size() -> Option<u32> {
    Some(DEFAULT_MIN_RASTER_EXPORT_SIZE)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(error) => {
                    return (
                        Config::default(),
                        Some(format!("Ignoring {}: {}", path.display(), error)),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            generator: GeneratorConfig {
                debounce_ms: Some(120),
                min_display_ms: Some(0),
                preview_format: Some(ImageKind::Vector),
            },
            export: ExportConfig {
                output_dir: Some(PathBuf::from("/tmp/qr-out")),
                min_raster_size: Some(1024),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_returns_default_and_warning_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[generator\n").expect("write");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn load_with_override_without_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = toml::from_str("[generator]\npreview_format = \"vector\"\n")
            .expect("partial config should parse");
        assert_eq!(config.debounce(), Duration::from_millis(DEFAULT_DEBOUNCE_MS));
        assert_eq!(config.preview_format(), ImageKind::Vector);
        assert_eq!(config.min_raster_size(), DEFAULT_MIN_RASTER_EXPORT_SIZE);
    }

    #[test]
    fn accessors_clamp_out_of_range_values() {
        let config = Config {
            generator: GeneratorConfig {
                debounce_ms: Some(60_000),
                min_display_ms: Some(60_000),
                preview_format: None,
            },
            export: ExportConfig {
                output_dir: None,
                min_raster_size: Some(10),
            },
        };
        assert_eq!(config.debounce(), Duration::from_millis(MAX_DEBOUNCE_MS));
        assert_eq!(config.min_display(), Duration::from_millis(MAX_MIN_DISPLAY_MS));
        assert_eq!(config.min_raster_size(), MAX_QR_SIZE);
        assert_eq!(config.preview_format(), ImageKind::Raster);
    }
}
