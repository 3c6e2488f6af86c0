use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "BITFINEX_API_KEY";
pub const API_SECRET_ENV: &str = "BITFINEX_API_SECRET";

#[derive(Deserialize, Serialize, Clone)]
pub struct ExchangeConfig {
    #[serde(default = "default_public_url")]
    pub public_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

fn default_public_url() -> String {
    "https://api-pub.bitfinex.com".to_string()
}

fn default_auth_url() -> String {
    "https://api.bitfinex.com".to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            public_url: default_public_url(),
            auth_url: default_auth_url(),
            api_key: None,
            api_secret: None,
        }
    }
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("public_url", &self.public_url)
            .field("auth_url", &self.auth_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// API key pair used to sign wallet requests.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
            .context("No usable configuration, run `finex setup` to create one")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "finex", "finex")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("com", "finex", "finex")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Credentials from the environment, falling back to the config file.
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<Credentials> {
        let api_key = env(API_KEY_ENV).or_else(|| self.exchange.api_key.clone())?;
        let api_secret = env(API_SECRET_ENV).or_else(|| self.exchange.api_secret.clone())?;
        Some(Credentials {
            api_key,
            api_secret,
        })
    }
}
