//! Races the regex and embedding paths against one another and returns the
//! first acceptable result, cancelling the rest (spec §4.5).

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use cabin_nlu_core::model::Method;
use cabin_nlu_core::IntentData;
use cabin_nlu_matcher::{MatchOutcome, RegexMatcher};
use cabin_nlu_semantic::{DomainClassifier, IntentMatcher, IntentPrediction};

use crate::signal::{run_domain_classify, run_model, run_regex_domain, run_regex_global, PathSignal};

pub struct Orchestrator {
    matcher: Arc<RegexMatcher>,
    classifier: Arc<DomainClassifier>,
    intent_matcher: Arc<IntentMatcher>,
    confidence_threshold: f32,
    similarity_threshold: f32,
    fallback_domain: String,
    fallback_intent: String,
    default_deadline: Duration,
}

/// Bookkeeping shared between the race loop and the deadline watcher so
/// that a timeout can abort whatever tasks are live at that moment,
/// including ones spawned mid-race (stage 2).
#[derive(Default)]
struct RaceHandles {
    handles: Mutex<Vec<AbortHandle>>,
}

impl RaceHandles {
    fn push(&self, handle: AbortHandle) {
        self.handles.lock().push(handle);
    }

    fn abort_all(&self) {
        for handle in self.handles.lock().iter() {
            handle.abort();
        }
    }
}

fn outcome_to_intent(outcome: MatchOutcome, raw_text: &str, method: Method) -> IntentData {
    IntentData {
        intent: outcome.intent,
        domain: outcome.domain,
        semantic: outcome.semantic,
        confidence: outcome.confidence,
        entities: outcome.entities,
        raw_text: raw_text.to_string(),
        method,
    }
}

fn prediction_to_intent(prediction: IntentPrediction, domain: String, raw_text: &str) -> IntentData {
    IntentData {
        intent: prediction.intent,
        domain,
        semantic: prediction.semantic,
        confidence: prediction.confidence,
        entities: prediction.entities,
        raw_text: raw_text.to_string(),
        method: Method::Model,
    }
}

impl Orchestrator {
    pub fn new(
        matcher: Arc<RegexMatcher>,
        classifier: Arc<DomainClassifier>,
        intent_matcher: Arc<IntentMatcher>,
        confidence_threshold: f32,
        similarity_threshold: f32,
        fallback_domain: impl Into<String>,
        fallback_intent: impl Into<String>,
        default_deadline: Duration,
    ) -> Self {
        Self {
            matcher,
            classifier,
            intent_matcher,
            confidence_threshold,
            similarity_threshold,
            fallback_domain: fallback_domain.into(),
            fallback_intent: fallback_intent.into(),
            default_deadline,
        }
    }

    /// The single recognition entry point (spec §6.1). Empty or
    /// whitespace-only text short-circuits to a `none` result.
    pub async fn recognize(
        &self,
        text: &str,
        domain: Option<String>,
        _context: Option<String>,
        session_id: Option<String>,
        deadline: Option<Duration>,
    ) -> IntentData {
        if text.trim().is_empty() {
            return IntentData::none(text, self.fallback_domain.clone());
        }

        let deadline = deadline.unwrap_or(self.default_deadline);
        tracing::debug!(session_id = session_id.as_deref().unwrap_or(""), %text, "recognize started");

        match domain {
            Some(d) => self.run_fast_path(text, d, deadline).await,
            None => self.run_full_flow(text, deadline).await,
        }
    }

    /// Fast path: the caller already knows the domain, so only stage 2
    /// (R vs M) runs.
    async fn run_fast_path(&self, text: &str, domain: String, deadline: Duration) -> IntentData {
        let token = CancellationToken::new();
        let handles = Arc::new(RaceHandles::default());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<PathSignal>();

        self.spawn_regex_domain(text, domain.clone(), token.clone(), tx.clone(), &handles);
        self.spawn_model(text, domain.clone(), token.clone(), tx.clone(), &handles);
        drop(tx);

        let race = async {
            let mut finished = 0;
            while let Some(signal) = rx.recv().await {
                let mut batch = vec![signal];
                while let Ok(extra) = rx.try_recv() {
                    batch.push(extra);
                }
                finished += batch.len();

                if let Some(winner) = self.pick_winner(&batch, text, &domain) {
                    token.cancel();
                    handles.abort_all();
                    return winner;
                }

                if finished >= 2 {
                    break;
                }
            }
            IntentData::none(text, domain.clone())
        };

        tokio::select! {
            result = race => result,
            _ = tokio::time::sleep(deadline) => {
                token.cancel();
                handles.abort_all();
                tracing::warn!(%text, "recognize deadline exceeded");
                IntentData::none(text, domain)
            }
        }
    }

    /// Full flow: stage 1 (G vs D), then stage 2 (R vs M) once D resolves
    /// a domain, all merged into a single precedence-ordered race.
    async fn run_full_flow(&self, text: &str, deadline: Duration) -> IntentData {
        let token = CancellationToken::new();
        let handles = Arc::new(RaceHandles::default());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<PathSignal>();

        self.spawn_regex_global(text, token.clone(), tx.clone(), &handles);
        self.spawn_domain_classify(text, token.clone(), tx.clone(), &handles);

        let race = async {
            let mut spawned = 2usize;
            let mut finished = 0usize;
            let mut stage2_spawned = false;
            let mut resolved_domain: Option<String> = None;

            while let Some(signal) = rx.recv().await {
                let mut batch = vec![signal];
                while let Ok(extra) = rx.try_recv() {
                    batch.push(extra);
                }
                finished += batch.len();

                for signal in &batch {
                    if let PathSignal::DomainClassified(Some((domain, _))) = signal {
                        resolved_domain = Some(domain.clone());
                    }
                }

                if !stage2_spawned {
                    if let Some(domain) = resolved_domain.clone() {
                        stage2_spawned = true;
                        self.spawn_regex_domain(text, domain.clone(), token.clone(), tx.clone(), &handles);
                        self.spawn_model(text, domain, token.clone(), tx.clone(), &handles);
                        spawned += 2;
                    }
                }

                let fallback_for_winner = resolved_domain.clone().unwrap_or_else(|| self.fallback_domain.clone());
                if let Some(winner) = self.pick_winner(&batch, text, &fallback_for_winner) {
                    token.cancel();
                    handles.abort_all();
                    return winner;
                }

                if finished >= spawned {
                    break;
                }
            }

            IntentData::none(text, resolved_domain.unwrap_or_else(|| self.fallback_domain.clone()))
        };

        tokio::select! {
            result = race => result,
            _ = tokio::time::sleep(deadline) => {
                token.cancel();
                handles.abort_all();
                tracing::warn!(%text, "recognize deadline exceeded");
                IntentData::none(text, self.fallback_domain.clone())
            }
        }
    }

    /// Among a batch of signals that completed together, picks the
    /// highest-precedence acceptable result, if any (spec §4.5, §8
    /// property 7).
    fn pick_winner(&self, batch: &[PathSignal], text: &str, domain_for_model: &str) -> Option<IntentData> {
        let mut acceptable: Vec<IntentData> = Vec::new();

        for signal in batch {
            match signal {
                PathSignal::RegexGlobal(Some(outcome)) if outcome.confidence >= self.confidence_threshold => {
                    acceptable.push(outcome_to_intent(outcome.clone(), text, Method::RegexGlobal));
                }
                PathSignal::RegexDomain(Some(outcome)) if outcome.confidence >= self.confidence_threshold => {
                    acceptable.push(outcome_to_intent(outcome.clone(), text, Method::RegexDomain));
                }
                PathSignal::Model(Some(prediction))
                    if prediction.confidence >= self.similarity_threshold
                        && prediction.intent != self.fallback_intent =>
                {
                    acceptable.push(prediction_to_intent(prediction.clone(), domain_for_model.to_string(), text));
                }
                _ => {}
            }
        }

        acceptable.into_iter().min_by_key(|result| result.method.precedence())
    }

    fn spawn_regex_global(
        &self,
        text: &str,
        token: CancellationToken,
        tx: tokio::sync::mpsc::UnboundedSender<PathSignal>,
        handles: &Arc<RaceHandles>,
    ) {
        let matcher = self.matcher.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            let signal = run_regex_global(matcher, text, token).await;
            let _ = tx.send(signal);
        });
        handles.push(handle.abort_handle());
    }

    fn spawn_domain_classify(
        &self,
        text: &str,
        token: CancellationToken,
        tx: tokio::sync::mpsc::UnboundedSender<PathSignal>,
        handles: &Arc<RaceHandles>,
    ) {
        let classifier = self.classifier.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            let signal = run_domain_classify(classifier, text, token).await;
            let _ = tx.send(signal);
        });
        handles.push(handle.abort_handle());
    }

    fn spawn_regex_domain(
        &self,
        text: &str,
        domain: String,
        token: CancellationToken,
        tx: tokio::sync::mpsc::UnboundedSender<PathSignal>,
        handles: &Arc<RaceHandles>,
    ) {
        let matcher = self.matcher.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            let signal = run_regex_domain(matcher, text, domain, token).await;
            let _ = tx.send(signal);
        });
        handles.push(handle.abort_handle());
    }

    fn spawn_model(
        &self,
        text: &str,
        domain: String,
        token: CancellationToken,
        tx: tokio::sync::mpsc::UnboundedSender<PathSignal>,
        handles: &Arc<RaceHandles>,
    ) {
        let intent_matcher = self.intent_matcher.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            let signal = run_model(intent_matcher, text, domain, token).await;
            let _ = tx.send(signal);
        });
        handles.push(handle.abort_handle());
    }
}
