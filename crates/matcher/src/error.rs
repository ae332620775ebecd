use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("vocabulary expansion failed: {0}")]
    Vocabulary(String),

    #[error("pattern {pattern:?} failed to compile: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("rule file for domain {0:?} has no patterns")]
    EmptyDomain(String),
}

impl From<MatcherError> for cabin_nlu_core::Error {
    fn from(err: MatcherError) -> Self {
        cabin_nlu_core::Error::Matcher(err.to_string())
    }
}
