use crate::error::{Result, SyncError};
use crate::resolve::KeywordRule;
use directories::ProjectDirs;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LEGACY_ENCODING: &str = "gbk";

/// Overrides the config directory. Mostly for tests and portable installs.
pub const HOME_ENV: &str = "VBASYNC_HOME";

pub const KEYS: [&str; 2] = ["legacy-encoding", "keywords"];

/// Configuration for vbasync, stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Codepage tried when an exported file is not valid UTF-8 (any WHATWG label)
    #[serde(default = "default_legacy_encoding")]
    pub legacy_encoding: String,

    /// File-name keyword rules appended after the built-in ones
    #[serde(default)]
    pub keywords: Vec<KeywordRule>,
}

fn default_legacy_encoding() -> String {
    DEFAULT_LEGACY_ENCODING.to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            legacy_encoding: default_legacy_encoding(),
            keywords: Vec::new(),
        }
    }
}

/// `$VBASYNC_HOME` when set, otherwise the platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "vbasync", "vbasync")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| SyncError::Config("Could not determine config dir".to_string()))
}

impl SyncConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&config_path).map_err(|e| SyncError::file_io(&config_path, e))?;
        let config: SyncConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(|e| SyncError::file_io(config_dir, e))?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content).map_err(|e| SyncError::file_io(&config_path, e))?;
        Ok(())
    }

    /// The legacy codepage, resolved.
    pub fn encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.legacy_encoding.trim().as_bytes()).ok_or_else(|| {
            SyncError::Config(format!("Unknown encoding: {}", self.legacy_encoding))
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "legacy-encoding" => Some(self.legacy_encoding.clone()),
            "keywords" => Some(
                self.keywords
                    .iter()
                    .map(|rule| rule.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }

    /// `keywords` takes a comma-separated list of `Keyword=Kind`; an empty value
    /// clears it.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "legacy-encoding" => {
                let encoding = Encoding::for_label(value.trim().as_bytes())
                    .ok_or_else(|| format!("Unknown encoding: {}", value))?;
                self.legacy_encoding = encoding.name().to_ascii_lowercase();
                Ok(())
            }
            "keywords" => {
                self.keywords = value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::parse)
                    .collect::<std::result::Result<Vec<KeywordRule>, String>>()?;
                Ok(())
            }
            other => Err(format!("Unknown config key: {}", other)),
        }
    }
}
