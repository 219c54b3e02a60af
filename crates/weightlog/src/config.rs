//! Configuration management for weightlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::records::WeightUnit;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default application directory name.
const APP_DIR_NAME: &str = "weightlog";

/// Default name of the CSV directory inside the application directory.
const DATA_DIR_NAME: &str = "data";

/// Default name of the local images directory inside the data directory.
const IMAGES_DIR_NAME: &str = "images";

/// Default Cloudinary API base URL.
const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `WEIGHTLOG_`, sections separated
///    by `__`, e.g. `WEIGHTLOG_CLOUDINARY__CLOUD_NAME`)
/// 2. TOML config file at `~/.config/weightlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Photo configuration.
    pub photos: PhotoConfig,
    /// Cloudinary configuration.
    pub cloudinary: CloudinaryConfig,
    /// Dashboard configuration.
    pub dashboard: DashboardConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the CSV logs.
    /// Defaults to `~/.local/share/weightlog/data`
    pub data_dir: Option<PathBuf>,
}

/// Photo-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Accept photos on meals.
    pub enabled: bool,
    /// Largest photo accepted, in bytes.
    pub max_bytes: u64,
    /// Where photos are kept when Cloudinary is not configured.
    /// Defaults to `<data_dir>/images`
    pub images_dir: Option<PathBuf>,
}

/// Cloudinary upload configuration.
///
/// Uploads are enabled only when both `cloud_name` and `upload_preset` are
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudinaryConfig {
    /// Cloudinary cloud name.
    pub cloud_name: Option<String>,
    /// Unsigned upload preset.
    pub upload_preset: Option<String>,
    /// Folder to upload into.
    pub folder: Option<String>,
    /// API base URL.
    pub api_base: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Dashboard-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Entries in the short-term weight trend.
    pub short_window: usize,
    /// Entries in the long-term weight trend.
    pub long_window: usize,
    /// Entries averaged for the moving average.
    pub moving_average: usize,
    /// Unit weights are shown in.
    pub unit: WeightUnit,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 10 * 1024 * 1024, // 10 MiB
            images_dir: None,            // Resolved relative to data_dir
        }
    }
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            upload_preset: None,
            folder: None,
            api_base: CLOUDINARY_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            short_window: 90,
            long_window: 365,
            moving_average: 7,
            unit: WeightUnit::Kg,
        }
    }
}

impl CloudinaryConfig {
    /// Check whether uploads are fully configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.cloud_name.is_some() && self.upload_preset.is_some()
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `WEIGHTLOG_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("WEIGHTLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        // Validate dashboard config
        if self.dashboard.short_window == 0 || self.dashboard.long_window == 0 {
            return Err(Error::ConfigValidation {
                message: "short_window and long_window must be greater than 0".to_string(),
            });
        }

        if self.dashboard.short_window > self.dashboard.long_window {
            return Err(Error::ConfigValidation {
                message: format!(
                    "short_window ({}) cannot be greater than long_window ({})",
                    self.dashboard.short_window, self.dashboard.long_window
                ),
            });
        }

        if self.dashboard.moving_average == 0 {
            return Err(Error::ConfigValidation {
                message: "moving_average must be greater than 0".to_string(),
            });
        }

        // Validate photo config
        if self.photos.max_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "photos.max_bytes must be greater than 0".to_string(),
            });
        }

        // Validate cloudinary config
        if self.cloudinary.cloud_name.is_some() != self.cloudinary.upload_preset.is_some() {
            return Err(Error::ConfigValidation {
                message: "cloudinary needs both cloud_name and upload_preset".to_string(),
            });
        }

        if self.cloudinary.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "cloudinary.timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the local images directory, resolving defaults if not set.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.photos
            .images_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join(IMAGES_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.data_dir.is_none());
        assert!(config.photos.enabled);
        assert!(!config.cloudinary.is_configured());
        assert_eq!(config.dashboard.unit, WeightUnit::Kg);
    }

    #[test]
    fn test_default_photo_config() {
        let photos = PhotoConfig::default();

        assert!(photos.enabled);
        assert_eq!(photos.max_bytes, 10 * 1024 * 1024);
        assert!(photos.images_dir.is_none());
    }

    #[test]
    fn test_default_cloudinary_config() {
        let cloudinary = CloudinaryConfig::default();

        assert!(cloudinary.cloud_name.is_none());
        assert!(cloudinary.upload_preset.is_none());
        assert_eq!(cloudinary.api_base, "https://api.cloudinary.com/v1_1");
        assert_eq!(cloudinary.timeout_secs, 30);
    }

    #[test]
    fn test_default_dashboard_config() {
        let dashboard = DashboardConfig::default();

        assert_eq!(dashboard.short_window, 90);
        assert_eq!(dashboard.long_window, 365);
        assert_eq!(dashboard.moving_average, 7);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_window() {
        let mut config = Config::default();
        config.dashboard.short_window = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("short_window"));
    }

    #[test]
    fn test_validate_short_longer_than_long() {
        let mut config = Config::default();
        config.dashboard.short_window = 400;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cannot be greater"));
    }

    #[test]
    fn test_validate_zero_moving_average() {
        let mut config = Config::default();
        config.dashboard.moving_average = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_max_bytes() {
        let mut config = Config::default();
        config.photos.max_bytes = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_bytes"));
    }

    #[test]
    fn test_validate_half_configured_cloudinary() {
        let mut config = Config::default();
        config.cloudinary.cloud_name = Some("demo".to_string());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("upload_preset"));

        config.cloudinary.upload_preset = Some("meals".to_string());
        assert!(config.validate().is_ok());
        assert!(config.cloudinary.is_configured());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.cloudinary.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_data_dir_default() {
        let config = Config::default();
        let path = config.data_dir();

        assert!(path.to_string_lossy().contains("weightlog"));
        assert!(path.ends_with("data"));
    }

    #[test]
    fn test_data_dir_custom() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/custom/data"));

        assert_eq!(config.data_dir(), PathBuf::from("/custom/data"));
        assert_eq!(config.images_dir(), PathBuf::from("/custom/data/images"));
    }

    #[test]
    fn test_images_dir_custom() {
        let mut config = Config::default();
        config.photos.images_dir = Some(PathBuf::from("/photos"));

        assert_eq!(config.images_dir(), PathBuf::from("/photos"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("weightlog"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
data_dir = "/srv/weightlog"

[dashboard]
short_window = 30
unit = "lb"

[cloudinary]
cloud_name = "demo"
upload_preset = "meals"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/weightlog"));
        assert_eq!(config.dashboard.short_window, 30);
        assert_eq!(config.dashboard.long_window, 365);
        assert_eq!(config.dashboard.unit, WeightUnit::Lb);
        assert!(config.cloudinary.is_configured());
    }

    #[test]
    fn test_load_invalid_toml_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dashboard]\nshort_window = 0\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_dashboard_config_deserialize() {
        let json = r#"{"short_window": 14, "unit": "lb"}"#;
        let dashboard: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.short_window, 14);
        assert_eq!(dashboard.long_window, 365);
        assert_eq!(dashboard.unit, WeightUnit::Lb);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("short_window"));
        assert!(json.contains("api_base"));
    }
}
