//! Tokenizer registry
//!
//! The registry provides a central point for registering, discovering,
//! and instantiating tokenizer backends.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::core::error::{Result, SegError};
use crate::engine::config::{ConfigFile, TokenizerVariant};
use crate::engine::lexicon_adapter::{self, LexiconTokenizer};
use crate::engine::statistical_adapter::{self, StatisticalTokenizer};
use crate::engine::traits::{Tokenizer, TokenizerInfo};
use crate::engine::whitespace::{self, WhitespaceTokenizer};
use crate::text::{
    default_converter, NormalizationOptions, ScriptConverter, TableConverter, TextNormalizer,
};

/// Normalization settings handed to a factory
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub normalizer: TextNormalizer,
    pub defaults: NormalizationOptions,
}

impl BuildContext {
    /// Context using the process-wide converter and default steps
    pub fn from_env() -> Self {
        Self {
            normalizer: TextNormalizer::new(default_converter()),
            defaults: NormalizationOptions::default(),
        }
    }

    /// Context described by a config file.
    ///
    /// An explicitly configured conversion table must load; without one the
    /// process-wide converter is used when present.
    pub fn from_config(config: &ConfigFile) -> Result<Self> {
        let converter = match &config.conversion_table {
            Some(path) => Some(load_table(path)?),
            None => default_converter(),
        };
        Ok(Self {
            normalizer: TextNormalizer::new(converter),
            defaults: config.normalization,
        })
    }
}

fn load_table(path: &Path) -> Result<Arc<dyn ScriptConverter>> {
    Ok(Arc::new(TableConverter::load(path)?))
}

/// Factory function type for creating tokenizers
pub type TokenizerFactory =
    Arc<dyn Fn(&TokenizerVariant, &BuildContext) -> Result<Box<dyn Tokenizer>> + Send + Sync>;

/// Tokenizer registry
pub struct TokenizerRegistry {
    /// Registered factories
    factories: RwLock<HashMap<String, TokenizerFactory>>,
    /// Tokenizer information cache
    info_cache: RwLock<HashMap<String, TokenizerInfo>>,
    /// Default tokenizer ID
    default_id: RwLock<Option<String>>,
}

fn lock_error(location: &str) -> SegError {
    SegError::Internal {
        message: "Failed to acquire registry lock".to_string(),
        location: Some(location.to_string()),
    }
}

impl TokenizerRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
            info_cache: RwLock::new(HashMap::new()),
            default_id: RwLock::new(None),
        }
    }

    /// Register a factory under `info.id`, replacing any previous one
    pub fn register<F>(&self, info: TokenizerInfo, factory: F) -> Result<()>
    where
        F: Fn(&TokenizerVariant, &BuildContext) -> Result<Box<dyn Tokenizer>>
            + Send
            + Sync
            + 'static,
    {
        let id = info.id.clone();

        self.factories
            .write()
            .map_err(|_| lock_error("TokenizerRegistry::register"))?
            .insert(id.clone(), Arc::new(factory));

        self.info_cache
            .write()
            .map_err(|_| lock_error("TokenizerRegistry::register"))?
            .insert(id, info);

        Ok(())
    }

    /// Unregister a tokenizer
    pub fn unregister(&self, id: &str) -> Result<()> {
        self.factories
            .write()
            .map_err(|_| lock_error("TokenizerRegistry::unregister"))?
            .remove(id);

        self.info_cache
            .write()
            .map_err(|_| lock_error("TokenizerRegistry::unregister"))?
            .remove(id);

        let mut default = self
            .default_id
            .write()
            .map_err(|_| lock_error("TokenizerRegistry::unregister"))?;
        if default.as_deref() == Some(id) {
            *default = None;
        }

        Ok(())
    }

    /// Get list of registered tokenizers, sorted by id
    pub fn list(&self) -> Result<Vec<TokenizerInfo>> {
        let cache = self
            .info_cache
            .read()
            .map_err(|_| lock_error("TokenizerRegistry::list"))?;

        let mut infos: Vec<TokenizerInfo> = cache.values().cloned().collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }

    /// Check if a tokenizer is registered
    pub fn is_registered(&self, id: &str) -> bool {
        self.info_cache
            .read()
            .map(|cache| cache.contains_key(id))
            .unwrap_or(false)
    }

    /// Get tokenizer info by ID
    pub fn get_info(&self, id: &str) -> Result<Option<TokenizerInfo>> {
        let cache = self
            .info_cache
            .read()
            .map_err(|_| lock_error("TokenizerRegistry::get_info"))?;

        Ok(cache.get(id).cloned())
    }

    /// Build a new tokenizer for `variant`
    pub fn create(
        &self,
        variant: &TokenizerVariant,
        context: &BuildContext,
    ) -> Result<Box<dyn Tokenizer>> {
        let factory = {
            let factories = self
                .factories
                .read()
                .map_err(|_| lock_error("TokenizerRegistry::create"))?;

            Arc::clone(factories.get(variant.id()).ok_or_else(|| SegError::Config {
                message: format!("Tokenizer '{}' not registered", variant.id()),
                path: None,
            })?)
        };

        factory(variant, context)
    }

    /// Set the default tokenizer
    pub fn set_default(&self, id: &str) -> Result<()> {
        if !self.is_registered(id) {
            return Err(SegError::Config {
                message: format!("Cannot set default: tokenizer '{}' not registered", id),
                path: None,
            });
        }

        let mut default = self
            .default_id
            .write()
            .map_err(|_| lock_error("TokenizerRegistry::set_default"))?;
        *default = Some(id.to_string());
        Ok(())
    }

    /// Get the default tokenizer ID
    pub fn default_id(&self) -> Option<String> {
        self.default_id.read().map(|d| d.clone()).unwrap_or(None)
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        let registered = self.info_cache.read().map(|c| c.len()).unwrap_or(0);

        RegistryStats {
            registered_tokenizers: registered,
            default_tokenizer: self.default_id(),
        }
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry statistics
#[derive(Debug, Clone)]
pub struct RegistryStats {
    /// Number of registered tokenizers
    pub registered_tokenizers: usize,
    /// Default tokenizer ID
    pub default_tokenizer: Option<String>,
}

/// Global tokenizer registry
static REGISTRY: once_cell::sync::Lazy<TokenizerRegistry> =
    once_cell::sync::Lazy::new(TokenizerRegistry::new);

/// Get the global tokenizer registry
pub fn global_registry() -> &'static TokenizerRegistry {
    &REGISTRY
}

fn mismatch(expected: &str, variant: &TokenizerVariant) -> SegError {
    SegError::Config {
        message: format!(
            "Factory '{}' cannot build a '{}' tokenizer",
            expected,
            variant.id()
        ),
        path: None,
    }
}

/// Register the built-in tokenizers with `registry`
pub fn register_builtin(registry: &TokenizerRegistry) -> Result<()> {
    registry.register(lexicon_adapter::engine_info(), |variant, context| {
        match variant {
            TokenizerVariant::Lexicon(config) => Ok(Box::new(
                LexiconTokenizer::new(config)?
                    .with_normalization(context.normalizer.clone(), context.defaults),
            ) as Box<dyn Tokenizer>),
            other => Err(mismatch(lexicon_adapter::ENGINE_ID, other)),
        }
    })?;

    registry.register(statistical_adapter::engine_info(), |variant, context| {
        match variant {
            TokenizerVariant::Statistical(config) => Ok(Box::new(
                StatisticalTokenizer::new(config)?
                    .with_normalization(context.normalizer.clone(), context.defaults),
            ) as Box<dyn Tokenizer>),
            other => Err(mismatch(statistical_adapter::ENGINE_ID, other)),
        }
    })?;

    registry.register(whitespace::engine_info(), |variant, _context| match variant {
        TokenizerVariant::Whitespace => {
            Ok(Box::new(WhitespaceTokenizer::new()) as Box<dyn Tokenizer>)
        }
        other => Err(mismatch(whitespace::ENGINE_ID, other)),
    })?;

    if registry.default_id().is_none() {
        registry.set_default(statistical_adapter::ENGINE_ID)?;
    }

    Ok(())
}

/// Register the built-in tokenizers with the global registry
pub fn init_tokenizers() -> Result<()> {
    let registry = global_registry();
    if registry.is_registered(lexicon_adapter::ENGINE_ID)
        && registry.is_registered(statistical_adapter::ENGINE_ID)
        && registry.is_registered(whitespace::ENGINE_ID)
    {
        return Ok(());
    }
    register_builtin(registry)?;
    info!("Registered {} built-in tokenizers", registry.stats().registered_tokenizers);
    Ok(())
}

/// Build the tokenizer described by a config file
pub fn build_tokenizer(config: &ConfigFile) -> Result<Box<dyn Tokenizer>> {
    init_tokenizers()?;
    let context = BuildContext::from_config(config)?;
    global_registry().create(&config.tokenizer, &context)
}
