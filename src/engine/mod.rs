//! Tokenizer Abstraction Layer
//!
//! One trait, one adapter per segmentation backend.
//!
//! # Backends
//! - **lexicon** - dictionary driven segmentation, optional tagging (`lac` mode)
//! - **statistical** - dictionary + HMM over a process-wide engine
//! - **whitespace** - naive whitespace splitter
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │                 (CLI, library callers)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    Tokenizer Trait                          │
//! │        tokenize()   tag()   tokenize_batch()                │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    Tokenizer Registry                       │
//! │  ┌──────────┐ ┌─────────────┐ ┌────────────┐               │
//! │  │ Lexicon  │ │ Statistical │ │ Whitespace │               │
//! │  └──────────┘ └─────────────┘ └────────────┘               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    Text Normalizer                          │
//! │     script conversion → half width → lowercase              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
mod dictionary;
pub mod lexicon_adapter;
pub mod registry;
pub mod statistical_adapter;
pub mod traits;
pub mod whitespace;

pub use config::{
    ConfigFile, GlobalConfig, LexiconConfig, LexiconMode, StatisticalConfig, TokenizerVariant,
};
pub use lexicon_adapter::LexiconTokenizer;
pub use registry::{
    build_tokenizer, global_registry, init_tokenizers, register_builtin, BuildContext,
    RegistryStats, TokenizerFactory, TokenizerRegistry,
};
pub use statistical_adapter::StatisticalTokenizer;
pub use traits::{
    clean_tokens, EngineFeature, EngineKind, TaggedToken, Tokenizer, TokenizeOptions,
    TokenizerInfo,
};
pub use whitespace::WhitespaceTokenizer;
