//! Core data model and provider traits for the cabin NLU recognition pipeline.
//!
//! This crate has no knowledge of configuration file formats, regex
//! compilation, or embedding model internals — it only defines the shapes
//! that the other crates in the workspace agree on.

pub mod error;
pub mod model;
pub mod traits;

pub use error::{Error, Result};
pub use model::{
    Entities, IntentData, Method, Semantic, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_SIMILARITY_THRESHOLD, FALLBACK_DOMAIN, FALLBACK_INTENT, SLOT_NAMES,
};
pub use traits::EmbeddingProvider;
