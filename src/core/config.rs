use crate::core::context::DEFAULT_RECENT_COUNT;
use crate::core::currency::{Currency, CurrencyRegistry};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssistantConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "API_KEY".to_string(),
        }
    }
}

fn default_recent_count() -> usize {
    DEFAULT_RECENT_COUNT
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Display currency used until the user selects one.
    #[serde(default)]
    pub currency: Option<String>,
    /// Replaces the built-in currency catalog. The first entry is the default.
    #[serde(default)]
    pub currencies: Option<Vec<Currency>>,
    pub data_path: Option<String>,
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: None,
            currencies: None,
            data_path: None,
            recent_count: DEFAULT_RECENT_COUNT,
            assistant: AssistantConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "finledger", "finledger")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "finledger", "finledger")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        // Reject a bad catalog here rather than on first use
        config.registry()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The currency catalog: the configured override, or the built-in one.
    pub fn registry(&self) -> Result<CurrencyRegistry> {
        match &self.currencies {
            Some(currencies) => CurrencyRegistry::new(currencies.clone())
                .context("Invalid currencies in config"),
            None => Ok(CurrencyRegistry::default()),
        }
    }
}
