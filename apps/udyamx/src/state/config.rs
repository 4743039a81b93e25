//! # Application Configuration
//!
//! ## Sources (later wins)
//! 1. Defaults (this file)
//! 2. Config file (`udyamx.toml` in the platform config dir, or an explicit path)
//! 3. Environment variables (`UDYAMX_*`)
//!
//! The result is validated once. [`AppConfig::load_or_default`] never fails:
//! a bad file is logged and replaced by defaults.
//!
//! ```toml
//! [business]
//! name = "Asha General Store"
//! address_lines = ["12 Market Road", "Pune, 411001"]
//!
//! [ai]
//! api_key = "..."
//! model = "gemini-2.5-flash"
//!
//! [sync]
//! delay_ms = 1500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use udyamx_ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use udyamx_ai::GeminiConfig;
use udyamx_core::print::BusinessDetails;
use udyamx_sync::SyncSettings;

const CONFIG_FILE_NAME: &str = "udyamx.toml";
const DATABASE_FILE_NAME: &str = "udyamx.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessSettings {
    pub name: String,
    pub address_lines: Vec<String>,
    pub currency_symbol: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        let details = BusinessDetails::default();
        BusinessSettings {
            name: details.name,
            address_lines: details.address_lines,
            currency_symbol: details.currency_symbol,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Without a key the app answers from the offline gateway.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Simulated round trip of the offline gateway.
    pub offline_latency_ms: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        AiSettings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            offline_latency_ms: 1500,
        }
    }
}

impl AiSettings {
    /// Gemini settings, when a non-blank key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let mut config = GeminiConfig::new(key);
        config.model = self.model.clone();
        config.base_url = self.base_url.clone();
        config.timeout = Duration::from_secs(self.timeout_secs);
        Some(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Delay before the "new scheme" notification appears.
    pub scheme_delay_secs: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings { scheme_delay_secs: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// When false the voice feature behaves as unsupported.
    pub enabled: bool,
    /// Upper bound on one action-extraction round trip.
    pub extraction_timeout_secs: u64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        VoiceSettings {
            enabled: true,
            extraction_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    /// Camera permission; when false scanning fails with PERMISSION_DENIED.
    pub camera: bool,
    /// Time the simulated scanner takes to "detect" a code.
    pub scan_delay_ms: u64,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings {
            camera: true,
            scan_delay_ms: 3300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Where `en.json`, `hi.json` and `mr.json` live. Default: `<data dir>/locales`,
    /// falling back to `./locales`.
    pub locales_dir: Option<PathBuf>,
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub business: BusinessSettings,
    pub ai: AiSettings,
    pub sync: SyncSettings,
    pub notifications: NotificationSettings,
    pub voice: VoiceSettings,
    pub scanner: ScannerSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    /// Loads defaults, then the config file, then environment overrides.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.business.name.trim().is_empty() {
            return Err(ConfigError::Invalid("business.name must not be empty".into()));
        }
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::Invalid("ai.timeout_secs must be greater than 0".into()));
        }
        if !self.ai.base_url.starts_with("http://") && !self.ai.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "ai.base_url must start with http:// or https://, got: {}",
                self.ai.base_url
            )));
        }
        if self.voice.extraction_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "voice.extraction_timeout_secs must be greater than 0".into(),
            ));
        }
        self.sync
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("UDYAMX_API_KEY") {
            debug!("Using AI API key from environment");
            self.ai.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("UDYAMX_AI_MODEL") {
            self.ai.model = model;
        }

        if let Ok(url) = std::env::var("UDYAMX_AI_BASE_URL") {
            self.ai.base_url = url;
        }

        if let Ok(name) = std::env::var("UDYAMX_BUSINESS_NAME") {
            self.business.name = name;
        }

        if let Ok(delay) = std::env::var("UDYAMX_SYNC_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => self.sync.delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid UDYAMX_SYNC_DELAY_MS"),
            }
        }

        if let Ok(dir) = std::env::var("UDYAMX_DATA_DIR") {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(dir) = std::env::var("UDYAMX_LOCALES_DIR") {
            self.storage.locales_dir = Some(PathBuf::from(dir));
        }

        if let Ok(enabled) = std::env::var("UDYAMX_VOICE") {
            self.voice.enabled = !matches!(enabled.to_lowercase().as_str(), "0" | "false" | "off");
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "udyamx", "udyamx")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Directory for the database and printed invoices.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".udyamx"))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE_NAME)
    }

    pub fn prints_dir(&self) -> PathBuf {
        self.data_dir().join("prints")
    }

    pub fn locales_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.locales_dir {
            return dir.clone();
        }
        let bundled = self.data_dir().join("locales");
        if bundled.is_dir() {
            bundled
        } else {
            Path::new("locales").to_path_buf()
        }
    }

    pub fn business_details(&self) -> BusinessDetails {
        BusinessDetails {
            name: self.business.name.clone(),
            address_lines: self.business.address_lines.clone(),
            currency_symbol: self.business.currency_symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sync.delay_ms, 1500);
        assert_eq!(config.notifications.scheme_delay_secs, 5);
        assert_eq!(config.business.name, "UdyamX Inc.");
        assert!(config.ai.gemini().is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[business]\nname = \"Asha Stores\"\n\n[ai]\napi_key = \"k-123\"\n\n[sync]\ndelay_ms = 250"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.business.name, "Asha Stores");
        assert_eq!(config.business.currency_symbol, "₹");
        assert_eq!(config.sync.delay_ms, 250);

        let gemini = config.ai.gemini().unwrap();
        assert_eq!(gemini.api_key, "k-123");
        assert_eq!(gemini.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_file_is_rejected_but_load_or_default_recovers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ai]\nbase_url = \"ftp://nope\"").unwrap();

        assert!(matches!(
            AppConfig::load(Some(file.path().to_path_buf())),
            Err(ConfigError::Invalid(_))
        ));

        let config = AppConfig::load_or_default(Some(file.path().to_path_buf()));
        assert_eq!(config.ai.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_blank_api_key_means_offline() {
        let mut config = AppConfig::default();
        config.ai.api_key = Some("   ".to_string());
        assert!(config.ai.gemini().is_none());
    }

    #[test]
    fn test_paths_follow_data_dir() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/udyamx-test"));
        assert_eq!(config.database_path(), PathBuf::from("/tmp/udyamx-test/udyamx.db"));
        assert_eq!(config.prints_dir(), PathBuf::from("/tmp/udyamx-test/prints"));
    }
}
