use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "PHOTOFIND_API_KEY";
pub const ENV_BASE_URL: &str = "PHOTOFIND_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "PHOTOFIND_TIMEOUT_SECS";

const CONFIG_FILE_NAME: &str = "config.json";

/// On-disk shape of `config.json`. Every field is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Conf {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,

    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Conf {
    /// Loads defaults, then `config.json` from the platform config directory,
    /// then the `PHOTOFIND_*` environment variables.
    pub fn new() -> Result<Self> {
        let mut conf = Self::load_from(&Self::default_config_dir()?)?;
        conf.apply_env(|key| std::env::var(key).ok());
        Ok(conf)
    }

    pub fn default_config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "photofind", "photofind")
            .context("Failed to get project directories")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Loads defaults overlaid with `config.json` from `config_dir`, if present.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        let file = if config_file.exists() {
            let content = fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read {}", config_file.display()))?;
            serde_json::from_str::<ConfFile>(&content)
                .with_context(|| format!("Failed to parse {}", config_file.display()))?
        } else {
            log::debug!("No config file at {:?}, using defaults", config_file);
            ConfFile::default()
        };

        Ok(Conf {
            config_dir: config_dir.to_path_buf(),
            config_file,
            api_key: file.api_key.filter(|k| !k.trim().is_empty()),
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Overrides fields from environment lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(e) => log::warn!("Ignoring invalid {}={:?}: {}", ENV_TIMEOUT_SECS, secs, e),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Writes the current settings to `config.json`, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create {}", self.config_dir.display()))?;

        let file = ConfFile {
            api_key: self.api_key.clone(),
            base_url: (self.base_url != DEFAULT_BASE_URL).then(|| self.base_url.clone()),
            timeout_secs: (self.timeout_secs != DEFAULT_TIMEOUT_SECS).then_some(self.timeout_secs),
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(&self.config_file, content)
            .with_context(|| format!("Failed to write {}", self.config_file.display()))?;
        Ok(())
    }

    /// The API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 4 {
                    "*".repeat(chars.len())
                } else {
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{}{}", "*".repeat(chars.len() - 4), tail)
                }
            }
        }
    }
}
