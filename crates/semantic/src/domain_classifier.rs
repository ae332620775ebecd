//! Predicts the best domain label for an utterance via embedding
//! similarity against per-domain centroids (spec §4.3).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use cabin_nlu_core::EmbeddingProvider;

use crate::document::DomainExamplesFile;
use crate::error::SemanticError;
use crate::vector::{centroid, cosine_similarity, unit_normalize};

pub struct DomainClassifier {
    provider: Arc<dyn EmbeddingProvider>,
    centroids: HashMap<String, Vec<f32>>,
    similarity_threshold: f32,
    fallback_domain: String,
    cache_capacity: usize,
    cache: Mutex<HashMap<String, (String, f32)>>,
}

impl std::fmt::Debug for DomainClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainClassifier")
            .field("centroids", &self.centroids)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("fallback_domain", &self.fallback_domain)
            .field("cache_capacity", &self.cache_capacity)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl DomainClassifier {
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        examples: &DomainExamplesFile,
        similarity_threshold: f32,
        fallback_domain: impl Into<String>,
        cache_capacity: usize,
    ) -> Result<Self, SemanticError> {
        let mut centroids = HashMap::new();

        for (domain, utterances) in &examples.0 {
            if utterances.is_empty() {
                return Err(SemanticError::EmptyDomain(domain.clone()));
            }
            let mut vectors = Vec::with_capacity(utterances.len());
            for utterance in utterances {
                let embedding = provider
                    .embed(utterance)
                    .await
                    .map_err(|e| SemanticError::Embedding(e.to_string()))?;
                vectors.push(embedding);
            }
            centroids.insert(domain.clone(), centroid(&vectors));
        }

        Ok(Self {
            provider,
            centroids,
            similarity_threshold,
            fallback_domain: fallback_domain.into(),
            cache_capacity,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Predicts `(domain, confidence)`. Falls back to the configured
    /// fallback domain when the best similarity is below the threshold,
    /// still returning the observed confidence (spec §4.3 step 4).
    pub async fn classify(&self, text: &str) -> Result<(String, f32), SemanticError> {
        if let Some(hit) = self.cache.lock().get(text).cloned() {
            tracing::debug!(%text, "domain classifier cache hit");
            return Ok(hit);
        }
        tracing::debug!(%text, "domain classifier cache miss, embedding utterance");

        let embedding = self
            .provider
            .embed(text)
            .await
            .map_err(|e| SemanticError::Embedding(e.to_string()))?;
        let normalized = unit_normalize(&embedding);

        let mut names: Vec<&String> = self.centroids.keys().collect();
        names.sort();

        let mut best: Option<(&str, f32)> = None;
        for name in names {
            let sim = cosine_similarity(&normalized, &self.centroids[name]);
            best = match best {
                None => Some((name.as_str(), sim)),
                // Strict `>` keeps the alphabetically-earlier name on ties.
                Some((_, best_sim)) if sim > best_sim => Some((name.as_str(), sim)),
                other => other,
            };
        }

        let result = match best {
            Some((name, sim)) if sim >= self.similarity_threshold => (name.to_string(), sim),
            Some((_, sim)) => (self.fallback_domain.clone(), sim),
            None => (self.fallback_domain.clone(), 0.0),
        };

        let mut cache = self.cache.lock();
        if cache.len() >= self.cache_capacity {
            tracing::debug!("domain classifier cache full, clearing before insert");
            cache.clear();
        }
        cache.insert(text.to_string(), result.clone());

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_nlu_embeddings::HashEmbedder;
    use std::collections::HashMap as StdHashMap;

    fn examples() -> DomainExamplesFile {
        let mut map = StdHashMap::new();
        map.insert(
            "车控".to_string(),
            vec!["打开车窗".to_string(), "关闭车窗".to_string(), "打开空调".to_string()],
        );
        map.insert(
            "音乐".to_string(),
            vec!["播放周杰伦的歌".to_string(), "我想听音乐".to_string()],
        );
        DomainExamplesFile(map)
    }

    #[tokio::test]
    async fn classify_picks_the_nearest_domain() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let classifier = DomainClassifier::build(provider, &examples(), 0.0, "通用", 16)
            .await
            .unwrap();
        let (domain, confidence) = classifier.classify("打开车窗").await.unwrap();
        assert_eq!(domain, "车控");
        assert!(confidence > 0.0);
    }

    #[tokio::test]
    async fn classify_falls_back_below_threshold() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let classifier = DomainClassifier::build(provider, &examples(), 1.1, "通用", 16)
            .await
            .unwrap();
        let (domain, _confidence) = classifier.classify("打开车窗").await.unwrap();
        assert_eq!(domain, "通用");
    }

    #[tokio::test]
    async fn repeated_calls_hit_the_cache() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let classifier = DomainClassifier::build(provider, &examples(), 0.0, "通用", 16)
            .await
            .unwrap();
        let first = classifier.classify("打开车窗").await.unwrap();
        let second = classifier.classify("打开车窗").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_domain_examples_are_rejected_at_build_time() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(64));
        let mut map = StdHashMap::new();
        map.insert("车控".to_string(), vec![]);
        let err = DomainClassifier::build(provider, &DomainExamplesFile(map), 0.5, "通用", 16)
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticError::EmptyDomain(d) if d == "车控"));
    }
}
