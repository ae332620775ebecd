//! A deterministic, model-free `EmbeddingProvider`. The real embedding
//! model is out of scope for this pipeline; call sites only depend on the
//! trait, and this implementation exists so the rest of the stack is
//! exercisable without one.

use async_trait::async_trait;

use cabin_nlu_core::{EmbeddingProvider, Result};

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimension];

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % self.dimension;
            embedding[idx] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embed_returns_a_unit_vector_of_the_configured_dimension() {
        let embedder = HashEmbedder::new(384);
        let embedding = embedder.embed("你好世界").await.unwrap();
        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn embed_is_deterministic_for_the_same_text() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("打开车窗").await.unwrap();
        let b = embedder.embed("打开车窗").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_text_yields_different_embeddings() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("打开车窗").await.unwrap();
        let b = embedder.embed("关闭空调").await.unwrap();
        assert_ne!(a, b);
    }
}
