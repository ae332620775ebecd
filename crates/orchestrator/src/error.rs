use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("embedding provider failed: {0}")]
    Embedding(String),
}

impl From<OrchestratorError> for cabin_nlu_core::Error {
    fn from(err: OrchestratorError) -> Self {
        cabin_nlu_core::Error::Embedding(err.to_string())
    }
}
