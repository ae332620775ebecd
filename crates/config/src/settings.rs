//! Service tunables, loaded from `config/default.{yaml,json}`, an optional
//! `config/{env}.*` overlay, and `CABIN_NLU__*` environment variables.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use cabin_nlu_core::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD, FALLBACK_DOMAIN, FALLBACK_INTENT};

use crate::error::ConfigError;

/// Paths to the on-disk document files the pipeline loads once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPaths {
    #[serde(default = "default_vocabulary_path")]
    pub vocabulary: String,
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,
    #[serde(default = "default_domain_examples_path")]
    pub domain_examples: String,
    #[serde(default = "default_intent_examples_path")]
    pub intent_examples: String,
}

impl Default for DocumentPaths {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary_path(),
            rules_dir: default_rules_dir(),
            domain_examples: default_domain_examples_path(),
            intent_examples: default_intent_examples_path(),
        }
    }
}

fn default_vocabulary_path() -> String {
    "config/vocabulary.json".to_string()
}
fn default_rules_dir() -> String {
    "config/rules".to_string()
}
fn default_domain_examples_path() -> String {
    "config/domain_examples.json".to_string()
}
fn default_intent_examples_path() -> String {
    "config/intent_examples.json".to_string()
}

/// Bounded-cache sizing for the semantic classifier/matcher result caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub domain_cache_capacity: usize,
    #[serde(default = "default_cache_capacity")]
    pub intent_cache_capacity: usize,
    #[serde(default = "default_cache_capacity")]
    pub embedding_cache_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            domain_cache_capacity: default_cache_capacity(),
            intent_cache_capacity: default_cache_capacity(),
            embedding_cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    #[serde(default = "default_fallback_domain")]
    pub fallback_domain: String,
    #[serde(default = "default_fallback_intent")]
    pub fallback_intent: String,
    /// Overall budget for a single `recognize` call, in milliseconds.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub documents: DocumentPaths,
}

fn default_confidence_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}
fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}
fn default_fallback_domain() -> String {
    FALLBACK_DOMAIN.to_string()
}
fn default_fallback_intent() -> String {
    FALLBACK_INTENT.to_string()
}
fn default_deadline_ms() -> u64 {
    1500
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            similarity_threshold: default_similarity_threshold(),
            fallback_domain: default_fallback_domain(),
            fallback_intent: default_fallback_intent(),
            deadline_ms: default_deadline_ms(),
            cache: CacheConfig::default(),
            documents: DocumentPaths::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "confidence_threshold".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "similarity_threshold".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if self.deadline_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "deadline_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment.
///
/// Priority (highest to lowest):
/// 1. Environment variables (`CABIN_NLU__` prefix)
/// 2. `config/{env}.*` (if `env` is specified)
/// 3. `config/default.*`
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{env_name}")).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("CABIN_NLU")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
