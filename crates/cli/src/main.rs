//! Command-line entry point: loads configuration and documents, wires the
//! pipeline together, and recognizes a single utterance per invocation.

use std::sync::Arc;
use std::time::Duration;

use cabin_nlu_config::{load_json, load_json_dir, load_settings, Settings};
use cabin_nlu_core::EmbeddingProvider;
use cabin_nlu_embeddings::{CachedEmbedder, HashEmbedder};
use cabin_nlu_matcher::{DomainRuleFile, RegexMatcher, RuleSet};
use cabin_nlu_orchestrator::Orchestrator;
use cabin_nlu_semantic::{DomainClassifier, DomainExamplesFile, IntentExamplesFile, IntentMatcher};
use cabin_nlu_vocabulary::{VocabularyDocument, VocabularyManager};

/// Fixed dimension of the reference embedding provider (spec §6.4's
/// embedding-model runtime is out of scope; this stands in for it).
const EMBEDDING_DIMENSION: usize = 384;

#[tokio::main]
async fn main() {
    let env = std::env::var("CABIN_NLU_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("fatal: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting cabin-nlu");

    let orchestrator = match build_orchestrator(&settings).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "fatal: pipeline initialization failed");
            std::process::exit(1);
        }
    };

    let (text, domain) = parse_args();
    tracing::debug!(%text, ?domain, "recognizing utterance");

    let result = orchestrator
        .recognize(&text, domain, None, None, Some(Duration::from_millis(settings.deadline_ms)))
        .await;

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize recognition result");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cabin_nlu=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn parse_args() -> (String, Option<String>) {
    let mut domain = None;
    let mut words = Vec::new();

    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--domain=") {
            domain = Some(value.to_string());
        } else {
            words.push(arg);
        }
    }

    (words.join(" "), domain)
}

async fn build_orchestrator(settings: &Settings) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let vocabulary_doc: VocabularyDocument = load_json(&settings.documents.vocabulary)?;
    let vocab = Arc::new(VocabularyManager::from_document(vocabulary_doc));
    tracing::info!(path = %settings.documents.vocabulary, "loaded vocabulary");

    let rule_files: Vec<DomainRuleFile> = load_json_dir(&settings.documents.rules_dir)?;
    let rules = RuleSet::build(&rule_files, &vocab)?;
    let matcher = Arc::new(RegexMatcher::new(rules, vocab.clone()));
    tracing::info!(dir = %settings.documents.rules_dir, files = rule_files.len(), "loaded domain rules");

    let domain_examples: DomainExamplesFile = load_json(&settings.documents.domain_examples)?;
    let intent_examples: IntentExamplesFile = load_json(&settings.documents.intent_examples)?;

    let provider: Arc<dyn EmbeddingProvider> = Arc::new(CachedEmbedder::new(
        HashEmbedder::new(EMBEDDING_DIMENSION),
        settings.cache.embedding_cache_capacity,
    ));

    let classifier = Arc::new(
        DomainClassifier::build(
            provider.clone(),
            &domain_examples,
            settings.similarity_threshold,
            settings.fallback_domain.clone(),
            settings.cache.domain_cache_capacity,
        )
        .await?,
    );
    tracing::info!("built domain classifier centroids");

    let intent_matcher = Arc::new(
        IntentMatcher::build(
            provider,
            vocab,
            &intent_examples,
            settings.similarity_threshold,
            settings.fallback_intent.clone(),
            settings.cache.intent_cache_capacity,
        )
        .await?,
    );
    tracing::info!("built intent matcher centroids");

    Ok(Orchestrator::new(
        matcher,
        classifier,
        intent_matcher,
        settings.confidence_threshold,
        settings.similarity_threshold,
        settings.fallback_domain.clone(),
        settings.fallback_intent.clone(),
        Duration::from_millis(settings.deadline_ms),
    ))
}
