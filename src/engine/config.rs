//! Tokenizer configuration management
//!
//! Provides the per-backend configuration records and the TOML config file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SegError};
use crate::text::NormalizationOptions;

/// Which backend to build, with its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum TokenizerVariant {
    /// Dictionary driven segmentation
    Lexicon(LexiconConfig),
    /// Dictionary + HMM segmentation over the process-wide engine
    Statistical(StatisticalConfig),
    /// Split on whitespace
    Whitespace,
}

impl TokenizerVariant {
    /// Registry id of the backend
    pub fn id(&self) -> &'static str {
        match self {
            TokenizerVariant::Lexicon(_) => "lexicon",
            TokenizerVariant::Statistical(_) => "statistical",
            TokenizerVariant::Whitespace => "whitespace",
        }
    }
}

impl Default for TokenizerVariant {
    fn default() -> Self {
        TokenizerVariant::Statistical(StatisticalConfig::default())
    }
}

/// Lexicon engine mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexiconMode {
    /// Segmentation only
    #[default]
    Seg,
    /// Segmentation and part-of-speech tagging
    Lac,
}

impl fmt::Display for LexiconMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexiconMode::Seg => write!(f, "seg"),
            LexiconMode::Lac => write!(f, "lac"),
        }
    }
}

impl FromStr for LexiconMode {
    type Err = SegError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "seg" => Ok(LexiconMode::Seg),
            "lac" => Ok(LexiconMode::Lac),
            other => Err(SegError::Config {
                message: format!("Unknown lexicon mode '{}', expected 'seg' or 'lac'", other),
                path: None,
            }),
        }
    }
}

/// Lexicon engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Extra vocabulary, one `word [freq] [tag]` entry per line
    #[serde(default)]
    pub custom_vocab: Option<PathBuf>,
    /// Replacement main dictionary
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    #[serde(default)]
    pub mode: LexiconMode,
    /// Request GPU execution
    #[serde(default)]
    pub use_gpu: bool,
}

/// Statistical engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticalConfig {
    /// User dictionary loaded into the process-wide engine
    #[serde(default)]
    pub user_dict: Option<PathBuf>,
}

/// Configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Configuration version
    #[serde(default = "default_version")]
    pub version: String,
    /// Traditional-to-simplified table file or directory
    #[serde(default)]
    pub conversion_table: Option<PathBuf>,
    /// Backend selection
    #[serde(default)]
    pub tokenizer: TokenizerVariant,
    /// Default normalization steps
    #[serde(default)]
    pub normalization: NormalizationOptions,
    /// Global settings
    #[serde(default)]
    pub global: GlobalConfig,
}

/// Global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| SegError::Io {
            message: format!("Failed to read config file: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            SegError::Config { message, .. } => SegError::Config {
                message,
                path: Some(path.as_ref().to_path_buf()),
            },
            other => other,
        })
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SegError::Config {
            message: format!("Failed to parse config file: {}", e),
            path: None,
        })
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SegError::Config {
            message: format!("Failed to serialize config: {}", e),
            path: None,
        })?;

        std::fs::write(path.as_ref(), content).map_err(|e| SegError::Io {
            message: format!("Failed to write config file: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;

        Ok(())
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            version: default_version(),
            conversion_table: None,
            tokenizer: TokenizerVariant::default(),
            normalization: NormalizationOptions::default(),
            global: GlobalConfig::default(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::default_config()
    }
}
