//! Lexicon Engine Adapter
//!
//! Dictionary driven segmentation: the best path through the word DAG of
//! the (optionally replaced) main dictionary, with HMM discovery of unknown
//! words disabled. Each instance owns its engine, so custom vocabularies do
//! not leak between instances.

use jieba_rs::Jieba;
use tracing::{debug, info, warn};

use crate::core::error::{Result, SegError, TextOperation};
use crate::engine::config::{LexiconConfig, LexiconMode};
use crate::engine::dictionary::{load_main_dict, load_vocab};
use crate::engine::traits::{
    clean_tokens, EngineFeature, EngineKind, TaggedToken, Tokenizer, TokenizeOptions,
    TokenizerInfo,
};
use crate::text::{default_converter, NormalizationOptions, TextNormalizer};

pub(crate) const ENGINE_ID: &str = "lexicon";

pub(crate) fn engine_info() -> TokenizerInfo {
    TokenizerInfo {
        id: ENGINE_ID.to_string(),
        name: "Lexicon".to_string(),
        description: "Dictionary driven segmentation with optional part-of-speech tagging"
            .to_string(),
        kind: EngineKind::Lexicon,
        features: vec![
            EngineFeature::Normalization,
            EngineFeature::CustomVocabulary,
            EngineFeature::CustomModel,
            EngineFeature::Tagging,
        ],
    }
}

/// Lexicon engine adapter
pub struct LexiconTokenizer {
    info: TokenizerInfo,
    jieba: Jieba,
    mode: LexiconMode,
    normalizer: TextNormalizer,
    defaults: NormalizationOptions,
}

impl LexiconTokenizer {
    /// Build the engine, loading the model and custom vocabulary if configured
    pub fn new(config: &LexiconConfig) -> Result<Self> {
        let mut jieba = match &config.model_path {
            Some(path) => load_main_dict(path, ENGINE_ID)?,
            None => Jieba::new(),
        };

        if let Some(vocab) = &config.custom_vocab {
            load_vocab(&mut jieba, vocab)?;
        }

        if config.use_gpu {
            warn!("GPU execution requested, the lexicon engine runs on CPU");
        }

        info!("Lexicon engine initialized (mode: {})", config.mode);

        Ok(Self {
            info: engine_info(),
            jieba,
            mode: config.mode,
            normalizer: TextNormalizer::new(default_converter()),
            defaults: NormalizationOptions::default(),
        })
    }

    /// Replace the normalizer and the default normalization steps
    pub fn with_normalization(
        mut self,
        normalizer: TextNormalizer,
        defaults: NormalizationOptions,
    ) -> Self {
        self.normalizer = normalizer;
        self.defaults = defaults;
        self
    }

    pub fn mode(&self) -> LexiconMode {
        self.mode
    }

    fn prepare(&self, text: &str, options: &TokenizeOptions) -> Result<String> {
        self.normalizer
            .normalize_with(text, self.defaults, &options.normalization)
    }
}

impl Tokenizer for LexiconTokenizer {
    fn info(&self) -> &TokenizerInfo {
        &self.info
    }

    fn tokenize(&self, text: &str, options: &TokenizeOptions) -> Result<Vec<String>> {
        let normalized = self.prepare(text, options)?;
        let tokens = clean_tokens(self.jieba.cut(&normalized, false));
        debug!("lexicon: {} chars -> {} tokens", normalized.chars().count(), tokens.len());
        Ok(tokens)
    }

    fn tag(&self, text: &str, options: &TokenizeOptions) -> Result<Vec<TaggedToken>> {
        if self.mode != LexiconMode::Lac {
            return Err(SegError::engine(
                ENGINE_ID,
                TextOperation::Tagging,
                "tagging requires mode 'lac'",
            ));
        }

        let normalized = self.prepare(text, options)?;
        let tagged = self
            .jieba
            .tag(&normalized, false)
            .into_iter()
            .filter_map(|t| {
                let word = t.word.trim();
                (!word.is_empty()).then(|| TaggedToken {
                    word: word.to_string(),
                    tag: t.tag.to_string(),
                })
            })
            .collect();
        Ok(tagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::text::TableConverter;

    fn plain() -> LexiconTokenizer {
        LexiconTokenizer::new(&LexiconConfig::default())
            .unwrap()
            .with_normalization(TextNormalizer::new(None), NormalizationOptions::default())
    }

    #[test]
    fn test_engine_info() {
        let tokenizer = plain();
        assert_eq!(tokenizer.info().id, "lexicon");
        assert_eq!(tokenizer.info().kind, EngineKind::Lexicon);
        assert!(tokenizer.info().features.contains(&EngineFeature::Tagging));
    }

    #[test]
    fn test_tokens_cover_normalized_input() {
        let tokenizer = plain();
        let tokens = tokenizer
            .tokenize("我们ＬＯＶＥ北京天安门！", &TokenizeOptions::default())
            .unwrap();
        assert!(tokens.iter().all(|t| !t.is_empty()));
        assert_eq!(tokens.concat(), "我们love北京天安门!");
    }

    #[test]
    fn test_whitespace_tokens_dropped() {
        let tokenizer = plain();
        let tokens = tokenizer
            .tokenize("  中文   分词  ", &TokenizeOptions::default())
            .unwrap();
        assert!(tokens.iter().all(|t| !t.trim().is_empty()));
        assert_eq!(tokens.concat(), "中文分词");
    }

    #[test]
    fn test_custom_vocab() {
        let mut vocab = tempfile::NamedTempFile::new().unwrap();
        writeln!(vocab, "永和服装饰品有限公司 200000 nt").unwrap();

        let config = LexiconConfig {
            custom_vocab: Some(vocab.path().to_path_buf()),
            ..Default::default()
        };
        let tokenizer = LexiconTokenizer::new(&config)
            .unwrap()
            .with_normalization(TextNormalizer::new(None), NormalizationOptions::default());

        let tokens = tokenizer
            .tokenize("永和服装饰品有限公司", &TokenizeOptions::default())
            .unwrap();
        assert_eq!(tokens, vec!["永和服装饰品有限公司"]);
    }

    #[test]
    fn test_missing_vocab_fails() {
        let config = LexiconConfig {
            custom_vocab: Some(PathBuf::from("/nonexistent/vocab.txt")),
            ..Default::default()
        };
        let err = LexiconTokenizer::new(&config).err().unwrap();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }

    #[test]
    fn test_malformed_vocab_fails() {
        let mut vocab = tempfile::NamedTempFile::new().unwrap();
        writeln!(vocab, "分词工具 1000 n").unwrap();
        writeln!(vocab, "坏词 notanumber n").unwrap();

        let config = LexiconConfig {
            custom_vocab: Some(vocab.path().to_path_buf()),
            ..Default::default()
        };
        let err = LexiconTokenizer::new(&config).err().unwrap();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }

    #[test]
    fn test_non_utf8_vocab_fails() {
        let mut vocab = tempfile::NamedTempFile::new().unwrap();
        vocab.write_all(b"\xff\xfe 100 n\n").unwrap();

        let config = LexiconConfig {
            custom_vocab: Some(vocab.path().to_path_buf()),
            ..Default::default()
        };
        let err = LexiconTokenizer::new(&config).err().unwrap();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }

    #[test]
    fn test_missing_model_fails() {
        let config = LexiconConfig {
            model_path: Some(PathBuf::from("/nonexistent/dict.txt")),
            ..Default::default()
        };
        let err = LexiconTokenizer::new(&config).err().unwrap();
        assert!(matches!(err, SegError::Construction { .. }));
    }

    #[test]
    fn test_custom_model_dictionary() {
        let mut model = tempfile::NamedTempFile::new().unwrap();
        writeln!(model, "分词 1000 n").unwrap();
        writeln!(model, "工具 1000 n").unwrap();

        let config = LexiconConfig {
            model_path: Some(model.path().to_path_buf()),
            ..Default::default()
        };
        let tokenizer = LexiconTokenizer::new(&config)
            .unwrap()
            .with_normalization(TextNormalizer::new(None), NormalizationOptions::none());

        let tokens = tokenizer
            .tokenize("分词工具", &TokenizeOptions::default())
            .unwrap();
        assert_eq!(tokens, vec!["分词", "工具"]);
    }

    #[test]
    fn test_tag_requires_lac_mode() {
        let tokenizer = plain();
        let err = tokenizer
            .tag("我爱北京", &TokenizeOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SegError::Engine {
                operation: TextOperation::Tagging,
                ..
            }
        ));
    }

    #[test]
    fn test_tag_in_lac_mode() {
        let config = LexiconConfig {
            mode: LexiconMode::Lac,
            ..Default::default()
        };
        let tokenizer = LexiconTokenizer::new(&config)
            .unwrap()
            .with_normalization(TextNormalizer::new(None), NormalizationOptions::default());

        let tagged = tokenizer
            .tag("我爱北京天安门", &TokenizeOptions::default())
            .unwrap();
        assert!(!tagged.is_empty());
        assert!(tagged.iter().all(|t| !t.word.is_empty() && !t.tag.is_empty()));
        let words: String = tagged.iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, "我爱北京天安门");
    }

    #[test]
    fn test_simplification_with_table() {
        let table = TableConverter::from_pairs([("們", "们"), ("門", "门")]);
        let tokenizer = LexiconTokenizer::new(&LexiconConfig::default())
            .unwrap()
            .with_normalization(
                TextNormalizer::new(Some(Arc::new(table))),
                NormalizationOptions::default(),
            );

        let tokens = tokenizer
            .tokenize("我們天安門", &TokenizeOptions::default())
            .unwrap();
        assert_eq!(tokens.concat(), "我们天安门");
    }
}
