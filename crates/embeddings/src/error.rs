use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("embedding provider failed: {0}")]
    Provider(String),
}

impl From<EmbeddingError> for cabin_nlu_core::Error {
    fn from(err: EmbeddingError) -> Self {
        cabin_nlu_core::Error::Embedding(err.to_string())
    }
}
