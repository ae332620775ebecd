//! Bounded, read-mostly cache in front of an `EmbeddingProvider`, keyed on
//! the exact input text.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use cabin_nlu_core::{EmbeddingProvider, Result};

/// Wraps an inner provider with a size-capped cache. Eviction is
/// first-seen-first-evicted: once `capacity` is reached, the next miss
/// clears the whole cache rather than tracking per-entry recency, which is
/// sufficient for a pipeline whose vocabulary of candidate texts is small
/// and mostly static after startup.
pub struct CachedEmbedder<P> {
    inner: P,
    capacity: usize,
    cache: Mutex<HashMap<String, Arc<Vec<f32>>>>,
}

impl<P> CachedEmbedder<P> {
    pub fn new(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cache.lock().get(text) {
            return Ok(hit.as_ref().clone());
        }

        tracing::debug!(%text, "embedding cache miss");
        let embedding = self.inner.embed(text).await?;

        let mut cache = self.cache.lock();
        if cache.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "embedding cache full, clearing before insert");
            cache.clear();
        }
        cache.insert(text.to_string(), Arc::new(embedding.clone()));

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
