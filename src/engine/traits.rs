//! Core traits for tokenizer abstraction
//!
//! These traits define the contract for all segmentation backends,
//! enabling a unified interface for different implementations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SegError, TextOperation};
use crate::text::NormalizationOverrides;

/// Core trait for all tokenizers
///
/// Implementations must be safe to share between threads; an engine whose
/// thread safety cannot be guaranteed is wrapped in a lock by its adapter.
pub trait Tokenizer: Send + Sync {
    /// Get tokenizer information
    fn info(&self) -> &TokenizerInfo;

    /// Split text into non-empty tokens
    fn tokenize(&self, text: &str, options: &TokenizeOptions) -> Result<Vec<String>>;

    /// Split text into tokens with part-of-speech tags
    fn tag(&self, _text: &str, _options: &TokenizeOptions) -> Result<Vec<TaggedToken>> {
        Err(SegError::engine(
            self.info().id.clone(),
            TextOperation::Tagging,
            "tagging is not supported by this tokenizer",
        ))
    }

    /// Tokenize several texts with the same options
    fn tokenize_batch(&self, texts: &[&str], options: &TokenizeOptions) -> Result<Vec<Vec<String>>> {
        texts
            .iter()
            .map(|text| self.tokenize(text, options))
            .collect()
    }
}

/// Tokenizer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerInfo {
    /// Unique tokenizer identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description
    pub description: String,
    /// Segmentation approach
    pub kind: EngineKind,
    /// Supported features
    pub features: Vec<EngineFeature>,
}

/// Segmentation approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    /// Dictionary lookup driven
    Lexicon,
    /// Dictionary plus probabilistic model
    Statistical,
    /// Whitespace splitting
    Naive,
}

/// Tokenizer features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineFeature {
    /// Applies text normalization before segmenting
    Normalization,
    /// Custom vocabulary files
    CustomVocabulary,
    /// Replaceable main dictionary
    CustomModel,
    /// Part-of-speech tagging
    Tagging,
    /// Exhaustive (all words) cut
    FullCut,
    /// HMM-assisted discovery of unknown words
    Hmm,
}

/// A token with its part-of-speech tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

/// Per-call tokenization options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Emit every dictionary word found instead of the best path
    pub cut_all: bool,
    /// Use the HMM for words missing from the dictionary
    pub hmm: bool,
    /// Normalization toggles for this call
    pub normalization: NormalizationOverrides,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            cut_all: false,
            hmm: true,
            normalization: NormalizationOverrides::default(),
        }
    }
}

impl TokenizeOptions {
    /// Parse options from string key/value pairs.
    ///
    /// Recognized keys: `cut_all`, `hmm`, `to_simplified`, `to_half_width`,
    /// `to_lowercase`. Values must be booleans.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let flag = parse_bool(key, value)?;
            match key {
                "cut_all" => options.cut_all = flag,
                "hmm" => options.hmm = flag,
                "to_simplified" => options.normalization.to_simplified = Some(flag),
                "to_half_width" => options.normalization.to_half_width = Some(flag),
                "to_lowercase" => options.normalization.to_lowercase = Some(flag),
                other => {
                    return Err(SegError::Config {
                        message: format!("Unknown tokenize option '{}'", other),
                        path: None,
                    })
                }
            }
        }
        Ok(options)
    }

    /// Parse options from a map
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        Self::from_pairs(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(SegError::Config {
            message: format!("Option '{}' expects a boolean, got '{}'", key, value),
            path: None,
        }),
    }
}

/// Trim every raw token and drop the ones left empty
pub fn clean_tokens<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
