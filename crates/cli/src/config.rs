//! Optional `gxl.toml` configuration.
//!
//! ```toml
//! [fmt]
//! indent = 2
//! ```
//!
//! Loaded from `--config <path>` when given, else from `gxl.toml` in the
//! current directory if present, else defaults.

use std::path::{Path, PathBuf};

use gxl_core::PrintOptions;
use serde::Deserialize;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "gxl.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GxlConfig {
    #[serde(default)]
    pub fmt: FmtConfig,
}

/// `[fmt]` section: printer settings for `gxl fmt`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FmtConfig {
    /// Spaces per nesting level, 1..=16.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    PrintOptions::default().indent
}

impl Default for FmtConfig {
    fn default() -> Self {
        FmtConfig {
            indent: default_indent(),
        }
    }
}

impl FmtConfig {
    pub(crate) fn print_options(&self) -> PrintOptions {
        PrintOptions {
            indent: self.indent,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("error reading config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config '{}': fmt.indent must be between 1 and 16, got {indent}", .path.display())]
    Indent { path: PathBuf, indent: usize },
}

pub(crate) fn load(explicit: Option<&Path>) -> Result<GxlConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.is_file() {
                log::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(GxlConfig::default());
            }
            p
        }
    };
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let config = parse_config(&text, &path)?;
    log::debug!("loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

pub(crate) fn parse_config(text: &str, path: &Path) -> Result<GxlConfig, ConfigError> {
    let config: GxlConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !(1..=16).contains(&config.fmt.indent) {
        return Err(ConfigError::Indent {
            path: path.to_path_buf(),
            indent: config.fmt.indent,
        });
    }
    Ok(config)
}
