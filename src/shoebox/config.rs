//! # Configuration
//!
//! Stored as `config.json` in the data directory. Every key has a default, so
//! a missing file or a partial one is fine.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `owner` | `local` | User id scoping rows and blob keys in the backing store |
//! | `retention_days` | `10` | How long trashed photos are kept |
//! | `cleanup_interval_hours` | `24` | How often the trash sweep runs |
//! | `remote` | none | Backing store location; absent means local-only |

use crate::error::{Result, ShoeboxError};
use crate::gallery::Settings;
use crate::lifecycle::{self, DEFAULT_CLEANUP_INTERVAL_HOURS, DEFAULT_RETENTION_DAYS};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_OWNER: &str = "local";

/// A century of trash is plenty; larger windows overflow timestamp arithmetic.
pub const MAX_RETENTION_DAYS: u32 = 36_500;
pub const MAX_CLEANUP_INTERVAL_HOURS: u32 = 87_600;

/// Keys accepted by `shoebox config`.
pub const CONFIG_KEYS: &[&str] = &[
    "owner",
    "retention-days",
    "cleanup-interval-hours",
    "remote-root",
    "public-base-url",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Directory holding the photo table and one binary folder per owner.
    pub root: PathBuf,

    /// When set, blob URLs are `{public_base_url}/{key}` instead of `file://` paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoeboxConfig {
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    #[serde(default = "default_cleanup_interval_hours")]
    pub cleanup_interval_hours: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

fn default_cleanup_interval_hours() -> u32 {
    DEFAULT_CLEANUP_INTERVAL_HOURS
}

impl Default for ShoeboxConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            retention_days: DEFAULT_RETENTION_DAYS,
            cleanup_interval_hours: DEFAULT_CLEANUP_INTERVAL_HOURS,
            remote: None,
        }
    }
}

impl ShoeboxConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShoeboxError::Io)?;
        let config: ShoeboxConfig =
            serde_json::from_str(&content).map_err(ShoeboxError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShoeboxError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShoeboxError::Serialization)?;
        fs::write(config_path, content).map_err(ShoeboxError::Io)?;
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            // Hand-edited files skip `set`, so clamp here too.
            retention: lifecycle::retention(self.retention_days.min(MAX_RETENTION_DAYS)),
            cleanup_interval: Duration::hours(i64::from(
                self.cleanup_interval_hours.min(MAX_CLEANUP_INTERVAL_HOURS),
            )),
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "owner" => self.owner.clone(),
            "retention-days" => self.retention_days.to_string(),
            "cleanup-interval-hours" => self.cleanup_interval_hours.to_string(),
            "remote-root" => self
                .remote
                .as_ref()
                .map(|r| r.root.display().to_string())
                .unwrap_or_default(),
            "public-base-url" => self
                .remote
                .as_ref()
                .and_then(|r| r.public_base_url.clone())
                .unwrap_or_default(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    /// Set a key from its string form. An empty `remote-root` disables the backing store.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "owner" => {
                let owner = value.trim();
                if owner.is_empty() || owner.contains('/') || owner == ".." {
                    return Err(ShoeboxError::Config(format!("Invalid owner: {:?}", value)));
                }
                self.owner = owner.to_string();
            }
            "retention-days" => {
                self.retention_days = parse_bounded(key, value, MAX_RETENTION_DAYS)?;
            }
            "cleanup-interval-hours" => {
                self.cleanup_interval_hours =
                    parse_bounded(key, value, MAX_CLEANUP_INTERVAL_HOURS)?;
            }
            "remote-root" => {
                if value.is_empty() {
                    self.remote = None;
                } else {
                    let public_base_url = self.remote.take().and_then(|r| r.public_base_url);
                    self.remote = Some(RemoteConfig {
                        root: PathBuf::from(value),
                        public_base_url,
                    });
                }
            }
            "public-base-url" => {
                let remote = self.remote.as_mut().ok_or_else(|| {
                    ShoeboxError::Config("Set remote-root before public-base-url".to_string())
                })?;
                remote.public_base_url = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn parse_bounded(key: &str, value: &str, max: u32) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 && n <= max => Ok(n),
        _ => Err(ShoeboxError::Config(format!(
            "{} must be a positive whole number up to {}, got {:?}",
            key, max, value
        ))),
    }
}

fn unknown_key(key: &str) -> ShoeboxError {
    ShoeboxError::Config(format!(
        "Unknown config key: {} (known: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
