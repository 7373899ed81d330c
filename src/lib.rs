//! # hanseg - Chinese word segmentation adapters
//!
//! A thin layer over Chinese word segmentation engines. Text is normalized
//! (traditional to simplified script, full-width to half-width, lowercase)
//! before it is handed to the selected backend, and the resulting tokens are
//! trimmed with empty ones dropped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hanseg::{StatisticalConfig, StatisticalTokenizer, Tokenizer, TokenizeOptions};
//!
//! let tokenizer = StatisticalTokenizer::new(&StatisticalConfig::default())?;
//! let tokens = tokenizer.tokenize("我来到北京清华大学", &TokenizeOptions::default())?;
//! ```
//!
//! ## From a config file
//!
//! ```rust,ignore
//! use hanseg::{build_tokenizer, ConfigFile};
//!
//! let config = ConfigFile::load("hanseg.toml")?;
//! let tokenizer = build_tokenizer(&config)?;
//! ```
//!
//! ## Backends
//!
//! | Id | Approach | Tagging |
//! |----|----------|---------|
//! | `lexicon` | dictionary DAG, no HMM | `lac` mode |
//! | `statistical` (default) | dictionary + HMM, shared engine | yes |
//! | `whitespace` | split on whitespace | no |

#![allow(missing_docs)]
#![allow(rustdoc::missing_crate_level_docs)]

pub mod core;
pub mod engine;
pub mod text;

pub use crate::core::error::{Result, SegError, TextOperation};

pub use engine::{
    build_tokenizer, global_registry, init_tokenizers, BuildContext, ConfigFile, EngineFeature,
    EngineKind, LexiconConfig, LexiconMode, LexiconTokenizer, StatisticalConfig,
    StatisticalTokenizer, TaggedToken, Tokenizer, TokenizeOptions, TokenizerInfo,
    TokenizerRegistry, TokenizerVariant, WhitespaceTokenizer,
};

pub use text::{
    default_converter, NormalizationOptions, NormalizationOverrides, ScriptConverter,
    TableConverter, TextNormalizer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
