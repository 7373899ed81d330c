//! Text normalization
//!
//! Normalizes input text before segmentation by applying, in this order:
//! - Traditional-to-simplified script conversion
//! - Full-width to half-width character conversion
//! - Lowercasing

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::converter::ScriptConverter;
use crate::core::error::{Result, SegError};

/// Ideographic space, the full-width counterpart of U+0020
const IDEOGRAPHIC_SPACE: char = '\u{3000}';
/// Offset between the full-width forms block and printable ASCII
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

/// Which normalization steps to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationOptions {
    #[serde(default = "default_true")]
    pub to_simplified: bool,
    #[serde(default = "default_true")]
    pub to_half_width: bool,
    #[serde(default = "default_true")]
    pub to_lowercase: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            to_simplified: true,
            to_half_width: true,
            to_lowercase: true,
        }
    }
}

impl NormalizationOptions {
    /// All steps disabled
    pub fn none() -> Self {
        Self {
            to_simplified: false,
            to_half_width: false,
            to_lowercase: false,
        }
    }
}

/// Per-call overrides; `None` keeps the configured value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationOverrides {
    pub to_simplified: Option<bool>,
    pub to_half_width: Option<bool>,
    pub to_lowercase: Option<bool>,
}

/// Text normalizer holding an optional script converter
#[derive(Clone, Default)]
pub struct TextNormalizer {
    converter: Option<Arc<dyn ScriptConverter>>,
}

impl fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("has_converter", &self.converter.is_some())
            .finish()
    }
}

impl TextNormalizer {
    /// Create a normalizer; `None` disables script conversion
    pub fn new(converter: Option<Arc<dyn ScriptConverter>>) -> Self {
        Self { converter }
    }

    /// Whether traditional-to-simplified conversion is available
    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    /// Compute the options for a single call.
    ///
    /// Overrides win over `base`. Only a per-call `Some(true)` override counts
    /// as an explicit request for simplification and fails with
    /// [`SegError::ConversionUnavailable`] when no converter is loaded. An
    /// enabled `base.to_simplified` is dropped with a debug log instead, even
    /// when it was written out in a config file's `[normalization]` table.
    pub fn resolve(
        &self,
        base: NormalizationOptions,
        overrides: &NormalizationOverrides,
    ) -> Result<NormalizationOptions> {
        let mut options = NormalizationOptions {
            to_simplified: overrides.to_simplified.unwrap_or(base.to_simplified),
            to_half_width: overrides.to_half_width.unwrap_or(base.to_half_width),
            to_lowercase: overrides.to_lowercase.unwrap_or(base.to_lowercase),
        };

        if options.to_simplified && self.converter.is_none() {
            if overrides.to_simplified == Some(true) {
                return Err(SegError::ConversionUnavailable {
                    message: "simplification was requested but no conversion table is loaded"
                        .to_string(),
                });
            }
            debug!("No conversion table loaded, skipping simplification");
            options.to_simplified = false;
        }

        Ok(options)
    }

    /// Normalize input text
    pub fn normalize(&self, text: &str, options: &NormalizationOptions) -> Result<String> {
        let mut result = if options.to_simplified {
            let converter = self
                .converter
                .as_ref()
                .ok_or_else(|| SegError::ConversionUnavailable {
                    message: "no traditional-to-simplified table loaded".to_string(),
                })?;
            converter.convert(text)
        } else {
            text.to_string()
        };

        if options.to_half_width {
            result = full_width_to_half(&result);
        }

        if options.to_lowercase {
            result = result.to_lowercase();
        }

        Ok(result)
    }

    /// Resolve per-call overrides against `base`, then normalize
    pub fn normalize_with(
        &self,
        text: &str,
        base: NormalizationOptions,
        overrides: &NormalizationOverrides,
    ) -> Result<String> {
        let options = self.resolve(base, overrides)?;
        self.normalize(text, &options)
    }
}

/// Map one full-width character to its half-width form
pub fn to_half_width_char(c: char) -> char {
    if c == IDEOGRAPHIC_SPACE {
        return ' ';
    }
    match c as u32 {
        cp @ 0xFF01..=0xFF5E => char::from_u32(cp - FULL_WIDTH_OFFSET).unwrap_or(c),
        _ => c,
    }
}

/// Convert every full-width character in `text` to half-width
pub fn full_width_to_half(text: &str) -> String {
    text.chars().map(to_half_width_char).collect()
}
