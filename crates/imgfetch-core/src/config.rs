use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::RequestOptions;
use crate::validate::DEFAULT_MAX_FILE_SIZE;

/// Output directory used when none is configured.
pub const DEFAULT_DOWNLOAD_DIR: &str = "Fetched_Images";

/// Global configuration loaded from `~/.config/imgfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Directory images are saved into (relative paths resolve against the cwd).
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Maximum image size in bytes, declared or received.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Connect timeout and maximum stall, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional User-Agent header; a built-in value is sent when missing.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOWNLOAD_DIR)
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            max_file_size_bytes: default_max_file_size(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl FetcherConfig {
    /// Rejects values that would leave requests unbounded.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        if self.max_file_size_bytes == 0 {
            bail!("max_file_size_bytes must be at least 1");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            timeout: self.timeout(),
            max_bytes: self.max_file_size_bytes,
            user_agent: self.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetcherConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetcherConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetcherConfig = toml::from_str(&data)?;
    cfg.validate()
        .with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(cfg)
}
