use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

const HEADER: &str = "# bookmark-tree configuration\n\n";

/// User configuration, stored as TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding the ordered bookmarks and groups
    #[serde(default = "Config::default_bookmarks_path")]
    pub bookmarks_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bookmarks_path: Self::default_bookmarks_path(),
        }
    }
}

impl Config {
    pub fn new(bookmarks_path: impl Into<PathBuf>) -> Self {
        Self {
            bookmarks_path: bookmarks_path.into(),
        }
    }

    /// Load the config at `config_path`; a missing file is `Ok(None)`.
    ///
    /// `~` and environment variables in `bookmarks_path` are expanded, and a
    /// relative path is taken relative to the directory holding the config.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        Ok(Some(config.resolved_against(config_path.parent())))
    }

    fn resolved_against(mut self, config_dir: Option<&Path>) -> Self {
        let expanded = Self::expand_path(&self.bookmarks_path).unwrap_or(self.bookmarks_path);
        self.bookmarks_path = match config_dir {
            Some(dir) if expanded.is_relative() => dir.join(expanded),
            _ => expanded,
        };
        self
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Write the config with a header naming the tool, creating parent directories
    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = toml::to_string_pretty(self)?;
        std::fs::write(config_path, format!("{HEADER}{body}"))?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/bookmark-tree");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Where bookmarks live when no config file names a location
    pub fn default_bookmarks_path() -> PathBuf {
        let data_dir = shellexpand::tilde("~/.local/share/bookmark-tree");
        PathBuf::from(data_dir.as_ref()).join("bookmarks.json")
    }

    /// Expand `~` and environment variables; `None` when a variable is unset
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
