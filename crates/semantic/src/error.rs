use thiserror::Error;

#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("embedding provider failed while building centroids: {0}")]
    Embedding(String),

    #[error("domain {0:?} has no example utterances")]
    EmptyDomain(String),

    #[error("intent {0:?} has no example utterances")]
    EmptyIntent(String),
}

impl From<SemanticError> for cabin_nlu_core::Error {
    fn from(err: SemanticError) -> Self {
        cabin_nlu_core::Error::Semantic(err.to_string())
    }
}
