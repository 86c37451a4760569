//! Codec configuration.
//!
//! Settings come from defaults, a JSON file, or `HUFF_*` environment
//! variables; every source is validated before use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HuffError, Result};
use crate::header::HeaderFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Header written by compression
    pub header_format: HeaderFormat,
    /// Write output even when it is larger than the input
    pub force: bool,
    /// File suffix for compressed files
    pub suffix: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            header_format: HeaderFormat::Tree,
            force: false,
            suffix: ".hf".to_string(),
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.header_format.is_supported() {
            return Err(HuffError::configuration(format!(
                "header_format must be count or tree, not {}",
                self.header_format
            )));
        }
        if self.suffix.len() < 2 || !self.suffix.starts_with('.') {
            return Err(HuffError::configuration(format!(
                "suffix must start with '.' and be non-empty, got '{}'",
                self.suffix
            )));
        }
        Ok(())
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with_prefix("HUFF_")
    }

    /// Defaults overridden by `<prefix>HEADER_FORMAT`, `<prefix>FORCE` and `<prefix>SUFFIX`.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(format!("{}HEADER_FORMAT", prefix)) {
            config.header_format = value
                .parse()
                .map_err(|e| HuffError::configuration(format!("{}HEADER_FORMAT: {}", prefix, e)))?;
        }
        config.force = parse_env_bool(&format!("{}FORCE", prefix), config.force);
        if let Ok(value) = std::env::var(format!("{}SUFFIX", prefix)) {
            config.suffix = value;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| HuffError::configuration(format!("Failed to serialize codec config: {}", e)))?;
        std::fs::write(path, serialized)
            .map_err(|e| HuffError::configuration(format!("Failed to write codec config file: {}", e)))?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HuffError::configuration(format!("Failed to read codec config file: {}", e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| HuffError::configuration(format!("Failed to parse codec config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
