use graph::{BuildOptions, CharsetProfile, CommitOrder, DEFAULT_MAX_COMMITS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the repository root when no `--config` is given
pub const CONFIG_FILE_NAME: &str = ".tsgit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub max_commits: usize,
    pub order: CommitOrder,
    pub charset: CharsetProfile,
    pub message_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            graph: GraphConfig::default(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_commits: DEFAULT_MAX_COMMITS,
            order: CommitOrder::default(),
            charset: CharsetProfile::default(),
            message_width: 72,
        }
    }
}

impl GraphConfig {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            max_commits: self.max_commits,
            order: self.order,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file to load: the explicit path, else the repository's file if present
    pub fn locate(explicit: Option<&Path>, repo_root: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let candidate = repo_root.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Load the located file, falling back to defaults when there is none.
    /// Returns the path that was loaded alongside the config.
    pub fn discover(
        explicit: Option<&Path>,
        repo_root: &Path,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = Self::locate(explicit, repo_root);
        let config = match &path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        Ok((config, path))
    }
}
