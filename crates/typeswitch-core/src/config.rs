//! Configuration file loading for typeswitch.
//!
//! Reads `typeswitch.json` and provides typed access to all settings.
//! Falls back to sensible defaults when the config file is missing or incomplete.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "typeswitch.json";

/// Top-level typeswitch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeswitchConfig {
    /// Parse `_test.go` files along with the package.
    #[serde(default)]
    pub include_tests: bool,
    /// Load directly imported packages found in the module tree.
    #[serde(default = "default_true")]
    pub follow_imports: bool,
    /// Drop diagnostics in files marked `Code generated ... DO NOT EDIT.`.
    #[serde(default = "default_true")]
    pub skip_generated: bool,
    /// Glob patterns (relative to the walk root) of files to leave out.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
}

fn default_true() -> bool {
    true
}

impl Default for TypeswitchConfig {
    fn default() -> Self {
        Self {
            include_tests: false,
            follow_imports: true,
            skip_generated: true,
            ignore_patterns: vec![],
        }
    }
}

impl TypeswitchConfig {
    /// Load `typeswitch.json` from `dir`.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Load an explicitly requested config file. Unlike [`load`](Self::load),
    /// a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile `ignore_patterns` into a matcher.
    pub fn ignore_set(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Pattern {
            pattern: self.ignore_patterns.join(","),
            source,
        })
    }
}
