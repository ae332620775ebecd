//! Embedding-based domain classification and intent matching.

pub mod document;
pub mod domain_classifier;
pub mod error;
pub mod intent_matcher;
pub mod vector;

pub use document::{DomainExamplesFile, IntentExampleDoc, IntentExamplesFile};
pub use domain_classifier::DomainClassifier;
pub use error::SemanticError;
pub use intent_matcher::{IntentMatcher, IntentPrediction};
