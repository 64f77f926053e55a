//! Configuration loading from enumcheck.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::directive::DEFAULT_MARKER;
use crate::error::{EnumcheckError, EnumcheckResult, IoResultExt};

pub const CONFIG_FILE: &str = "enumcheck.toml";

/// Main configuration structure for enumcheck.toml.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnumcheckConfig {
    /// Directive marker token, `enumcheck` when absent.
    pub marker: Option<String>,
    /// Unit path patterns whose diagnostics are not reported.
    pub ignore: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl EnumcheckConfig {
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_MARKER)
    }

    pub fn ignore_patterns(&self) -> &[String] {
        self.ignore.as_deref().unwrap_or(&[])
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.as_ref().and_then(|o| o.format)
    }
}

/// Loads enumcheck.toml from `root`, or from the directory containing
/// `root` when it is a snapshot file.
pub fn load_config(root: &Path) -> EnumcheckResult<Option<EnumcheckConfig>> {
    let dir = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg: EnumcheckConfig =
        toml::from_str(&content).map_err(|e| EnumcheckError::config(&path, e.to_string()))?;
    if cfg.marker.as_deref().is_some_and(|m| m.trim().is_empty()) {
        return Err(EnumcheckError::config(&path, "marker must not be empty"));
    }
    Ok(Some(cfg))
}
