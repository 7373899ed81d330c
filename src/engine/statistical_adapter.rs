//! Statistical Engine Adapter
//!
//! Dictionary + HMM segmentation over a single process-wide engine. The
//! engine is built the first time any adapter is constructed and shared by
//! every instance afterwards; user dictionaries are merged into it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Instant;

use jieba_rs::Jieba;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::core::error::{Result, SegError, TextOperation};
use crate::engine::config::StatisticalConfig;
use crate::engine::dictionary::{merge_vocab, read_vocab, validate_vocab};
use crate::engine::traits::{
    clean_tokens, EngineFeature, EngineKind, TaggedToken, Tokenizer, TokenizeOptions,
    TokenizerInfo,
};
use crate::text::{default_converter, NormalizationOptions, TextNormalizer};

pub(crate) const ENGINE_ID: &str = "statistical";

pub(crate) fn engine_info() -> TokenizerInfo {
    TokenizerInfo {
        id: ENGINE_ID.to_string(),
        name: "Statistical".to_string(),
        description: "Dictionary segmentation with HMM discovery of unknown words".to_string(),
        kind: EngineKind::Statistical,
        features: vec![
            EngineFeature::Normalization,
            EngineFeature::CustomVocabulary,
            EngineFeature::Tagging,
            EngineFeature::FullCut,
            EngineFeature::Hmm,
        ],
    }
}

struct SharedEngine {
    jieba: RwLock<Jieba>,
    /// Canonical paths of user dictionaries already merged
    loaded: Mutex<HashSet<PathBuf>>,
}

static SHARED_ENGINE: OnceCell<SharedEngine> = OnceCell::new();
static INIT_COUNT: AtomicUsize = AtomicUsize::new(0);

fn shared_engine() -> &'static SharedEngine {
    SHARED_ENGINE.get_or_init(|| {
        let start = Instant::now();
        let jieba = Jieba::new();
        INIT_COUNT.fetch_add(1, Ordering::SeqCst);
        info!(
            "Statistical engine initialized in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        SharedEngine {
            jieba: RwLock::new(jieba),
            loaded: Mutex::new(HashSet::new()),
        }
    })
}

/// How many times the process-wide engine has been built (at most once)
pub(crate) fn init_count() -> usize {
    INIT_COUNT.load(Ordering::SeqCst)
}

fn lock_error(what: &str) -> SegError {
    SegError::Internal {
        message: format!("Failed to acquire lock on {}", what),
        location: Some("StatisticalTokenizer".to_string()),
    }
}

fn load_user_dict(engine: &SharedEngine, path: &Path) -> Result<()> {
    let canonical = path.canonicalize().map_err(|e| SegError::VocabLoad {
        message: format!("User dictionary not found: {}", e),
        path: path.to_path_buf(),
    })?;

    let mut loaded = engine.loaded.lock().map_err(|_| lock_error("user dictionaries"))?;
    if loaded.contains(&canonical) {
        debug!("User dictionary already loaded: {}", canonical.display());
        return Ok(());
    }

    // A rejected file must leave the shared engine untouched
    let content = read_vocab(&canonical)?;
    validate_vocab(&content, &canonical)?;

    let mut jieba = engine.jieba.write().map_err(|_| lock_error("engine"))?;
    merge_vocab(&mut jieba, &content, &canonical)?;
    loaded.insert(canonical);
    info!("Loaded user dictionary: {}", path.display());
    Ok(())
}

/// Statistical engine adapter
pub struct StatisticalTokenizer {
    info: TokenizerInfo,
    normalizer: TextNormalizer,
    defaults: NormalizationOptions,
}

impl StatisticalTokenizer {
    /// Initialize the shared engine (once) and merge the user dictionary
    pub fn new(config: &StatisticalConfig) -> Result<Self> {
        let engine = shared_engine();

        if let Some(path) = &config.user_dict {
            load_user_dict(engine, path)?;
        }

        Ok(Self {
            info: engine_info(),
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

    fn prepare(&self, text: &str, options: &TokenizeOptions) -> Result<String> {
        self.normalizer
            .normalize_with(text, self.defaults, &options.normalization)
    }
}

impl Tokenizer for StatisticalTokenizer {
    fn info(&self) -> &TokenizerInfo {
        &self.info
    }

    fn tokenize(&self, text: &str, options: &TokenizeOptions) -> Result<Vec<String>> {
        let normalized = self.prepare(text, options)?;
        let jieba = shared_engine().jieba.read().map_err(|_| {
            SegError::engine(ENGINE_ID, TextOperation::Tokenization, "engine lock poisoned")
        })?;

        let raw = if options.cut_all {
            jieba.cut_all(&normalized)
        } else {
            jieba.cut(&normalized, options.hmm)
        };
        let tokens = clean_tokens(raw);
        debug!(
            "statistical: {} chars -> {} tokens (cut_all={}, hmm={})",
            normalized.chars().count(),
            tokens.len(),
            options.cut_all,
            options.hmm
        );
        Ok(tokens)
    }

    fn tag(&self, text: &str, options: &TokenizeOptions) -> Result<Vec<TaggedToken>> {
        let normalized = self.prepare(text, options)?;
        let jieba = shared_engine().jieba.read().map_err(|_| {
            SegError::engine(ENGINE_ID, TextOperation::Tagging, "engine lock poisoned")
        })?;

        let tagged = jieba
            .tag(&normalized, options.hmm)
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

    fn plain() -> StatisticalTokenizer {
        StatisticalTokenizer::new(&StatisticalConfig::default())
            .unwrap()
            .with_normalization(TextNormalizer::new(None), NormalizationOptions::default())
    }

    #[test]
    fn test_engine_built_once() {
        let _a = plain();
        let _b = plain();
        let _c = StatisticalTokenizer::new(&StatisticalConfig::default()).unwrap();
        assert_eq!(init_count(), 1);
    }

    #[test]
    fn test_tokens_cover_normalized_input() {
        let tokenizer = plain();
        let tokens = tokenizer
            .tokenize("小明硕士毕业于中国科学院计算所，ＡＢＣ！", &TokenizeOptions::default())
            .unwrap();
        assert!(tokens.iter().all(|t| !t.is_empty()));
        assert_eq!(tokens.concat(), "小明硕士毕业于中国科学院计算所,abc!");
    }

    #[test]
    fn test_cut_all_emits_overlapping_words() {
        let tokenizer = plain();
        let exact = tokenizer
            .tokenize("中国科学院", &TokenizeOptions::default())
            .unwrap();
        let all = tokenizer
            .tokenize(
                "中国科学院",
                &TokenizeOptions {
                    cut_all: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(all.len() > exact.len());
        assert!(all.iter().any(|t| t == "中国"));
    }

    #[test]
    fn test_hmm_toggle() {
        let tokenizer = plain();
        let options = TokenizeOptions {
            hmm: false,
            ..Default::default()
        };
        let tokens = tokenizer.tokenize("我来到北京清华大学", &options).unwrap();
        assert_eq!(tokens.concat(), "我来到北京清华大学");
    }

    #[test]
    fn test_missing_user_dict_fails() {
        let config = StatisticalConfig {
            user_dict: Some(PathBuf::from("/nonexistent/user_dict.txt")),
        };
        let err = StatisticalTokenizer::new(&config).err().unwrap();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }

    #[test]
    fn test_user_dict_loaded_once() {
        let mut dict = tempfile::NamedTempFile::new().unwrap();
        writeln!(dict, "云计算平台组 500000 n").unwrap();
        let config = StatisticalConfig {
            user_dict: Some(dict.path().to_path_buf()),
        };

        let first = StatisticalTokenizer::new(&config)
            .unwrap()
            .with_normalization(TextNormalizer::new(None), NormalizationOptions::default());
        let _second = StatisticalTokenizer::new(&config).unwrap();

        let engine = shared_engine();
        let canonical = dict.path().canonicalize().unwrap();
        assert!(engine.loaded.lock().unwrap().contains(&canonical));

        let tokens = first
            .tokenize("云计算平台组", &TokenizeOptions::default())
            .unwrap();
        assert_eq!(tokens, vec!["云计算平台组"]);
    }

    #[test]
    fn test_malformed_user_dict_leaves_engine_untouched() {
        let mut dict = tempfile::NamedTempFile::new().unwrap();
        writeln!(dict, "甲乙丙丁戊 9000000 n").unwrap();
        writeln!(dict, "坏词 notanumber n").unwrap();
        let config = StatisticalConfig {
            user_dict: Some(dict.path().to_path_buf()),
        };

        for _ in 0..2 {
            let err = StatisticalTokenizer::new(&config).err().unwrap();
            assert!(matches!(err, SegError::VocabLoad { .. }));
        }

        let canonical = dict.path().canonicalize().unwrap();
        assert!(!shared_engine().loaded.lock().unwrap().contains(&canonical));

        let options = TokenizeOptions {
            hmm: false,
            ..Default::default()
        };
        let tokens = plain().tokenize("甲乙丙丁戊", &options).unwrap();
        assert!(!tokens.contains(&"甲乙丙丁戊".to_string()));
        assert_eq!(tokens.concat(), "甲乙丙丁戊");
    }

    #[test]
    fn test_non_utf8_user_dict_fails() {
        let mut dict = tempfile::NamedTempFile::new().unwrap();
        dict.write_all(b"\xe4\xb8 100 n\n\xff\xff\n").unwrap();
        let config = StatisticalConfig {
            user_dict: Some(dict.path().to_path_buf()),
        };
        let err = StatisticalTokenizer::new(&config).err().unwrap();
        assert!(matches!(err, SegError::VocabLoad { .. }));
    }

    #[test]
    fn test_tag() {
        let tokenizer = plain();
        let tagged = tokenizer
            .tag("我爱北京天安门", &TokenizeOptions::default())
            .unwrap();
        let words: String = tagged.iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, "我爱北京天安门");
        assert!(tagged.iter().all(|t| !t.tag.is_empty()));
    }
}
