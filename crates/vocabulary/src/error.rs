use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("unknown vocabulary group: {0}")]
    UnknownVocabularyGroup(String),

    #[error("vocabulary group {0:?} has no items")]
    EmptyGroup(String),

    #[error("template contains an unterminated {{{{ placeholder")]
    UnterminatedPlaceholder,
}

impl From<VocabularyError> for cabin_nlu_core::Error {
    fn from(err: VocabularyError) -> Self {
        cabin_nlu_core::Error::Vocabulary(err.to_string())
    }
}
