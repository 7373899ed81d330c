//! Whitespace tokenizer
//!
//! Splits on runs of whitespace. No normalization, no configuration.

use crate::core::error::Result;
use crate::engine::traits::{EngineKind, Tokenizer, TokenizeOptions, TokenizerInfo};

pub(crate) const ENGINE_ID: &str = "whitespace";

pub(crate) fn engine_info() -> TokenizerInfo {
    TokenizerInfo {
        id: ENGINE_ID.to_string(),
        name: "Whitespace".to_string(),
        description: "Naive splitter on whitespace runs".to_string(),
        kind: EngineKind::Naive,
        features: vec![],
    }
}

/// Naive whitespace splitter
#[derive(Debug, Clone)]
pub struct WhitespaceTokenizer {
    info: TokenizerInfo,
}

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self { info: engine_info() }
    }
}

impl Default for WhitespaceTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn info(&self) -> &TokenizerInfo {
        &self.info
    }

    fn tokenize(&self, text: &str, _options: &TokenizeOptions) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SegError;

    #[test]
    fn test_split_whitespace_runs() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens = tokenizer
            .tokenize("a  b\tc", &TokenizeOptions::default())
            .unwrap();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_normalization() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens = tokenizer
            .tokenize(" Ｈello　世界 ", &TokenizeOptions::default())
            .unwrap();
        // U+3000 is whitespace, full-width letters are kept as is
        assert_eq!(tokens, vec!["Ｈello", "世界"]);
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = WhitespaceTokenizer::new();
        assert!(tokenizer
            .tokenize("  \n\t ", &TokenizeOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_tagging_unsupported() {
        let tokenizer = WhitespaceTokenizer::new();
        let err = tokenizer.tag("a b", &TokenizeOptions::default()).unwrap_err();
        assert!(matches!(err, SegError::Engine { .. }));
    }
}
