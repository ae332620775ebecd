use thiserror::Error;

/// Workspace-wide error type.
///
/// Crate-local error enums (`VocabularyError`, `MatcherError`, `SemanticError`,
/// `ConfigError`, ...) convert into this one at crate boundaries.
#[derive(Error, Debug)]
pub enum Error {
    #[error("vocabulary error: {0}")]
    Vocabulary(String),

    #[error("matcher error: {0}")]
    Matcher(String),

    #[error("semantic error: {0}")]
    Semantic(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("embedding provider error: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, Error>;
