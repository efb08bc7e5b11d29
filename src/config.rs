use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{Identity, ParseSortError, SearchCriteria, DEFAULT_PAGE_SIZE};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub identity: Option<IdentitySettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

/// Default search knobs for the demo binary
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub breeds: Vec<String>,
    #[serde(default)]
    pub zip_codes: Vec<String>,
    #[serde(default)]
    pub age_min: Option<u8>,
    #[serde(default)]
    pub age_max: Option<u8>,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_page_size")]
    pub page_size: u8,
}

impl SearchSettings {
    /// Build search criteria from the configured knobs
    pub fn criteria(&self) -> Result<SearchCriteria, ParseSortError> {
        Ok(SearchCriteria {
            breeds: self.breeds.clone(),
            zip_codes: self.zip_codes.clone(),
            age_min: self.age_min,
            age_max: self.age_max,
            sort: self.sort.parse()?,
            page_size: self.page_size,
        })
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            breeds: Vec::new(),
            zip_codes: Vec::new(),
            age_min: None,
            age_max: None,
            sort: default_sort(),
            page_size: default_page_size(),
        }
    }
}

fn default_sort() -> String {
    "breed:asc".to_string()
}

fn default_page_size() -> u8 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> String {
    ".shelter-match".to_string()
}

/// Identity used by the demo binary when no session is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    pub name: String,
    pub email: String,
}

impl From<IdentitySettings> for Identity {
    fn from(settings: IdentitySettings) -> Self {
        Identity {
            name: settings.name,
            email: settings.email,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SHELTER_)
    ///    e.g., SHELTER_API__BASE_URL -> api.base_url
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SHELTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SHELTER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
