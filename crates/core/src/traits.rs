//! Provider boundary traits.
//!
//! `EmbeddingProvider` is the only collaborator the recognition core needs
//! from the embedding-model runtime (spec §6.4). The core never depends on
//! a concrete model; callers wire in whichever implementation they like.

use async_trait::async_trait;

use crate::error::Result;

/// Produces dense embeddings for semantic similarity.
///
/// Implementations must be safe for concurrent calls (§5); a provider that
/// cannot guarantee this must serialize internally rather than push the
/// burden onto callers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text`. Must be deterministic for a given input and must
    /// always return a vector of `dimension()` length.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Fixed dimension of vectors returned by `embed`.
    fn dimension(&self) -> usize;
}
