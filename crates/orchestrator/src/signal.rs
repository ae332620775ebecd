//! The four concurrent units of work (G, D, R, M) and the message they
//! report back to the race loop on completion (spec §4.5, §5).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use cabin_nlu_matcher::{MatchOutcome, RegexMatcher};
use cabin_nlu_semantic::{DomainClassifier, IntentMatcher, IntentPrediction};

pub enum PathSignal {
    RegexGlobal(Option<MatchOutcome>),
    DomainClassified(Option<(String, f32)>),
    RegexDomain(Option<MatchOutcome>),
    Model(Option<IntentPrediction>),
}

/// G: global regex match, independent of any resolved domain.
pub async fn run_regex_global(
    matcher: Arc<RegexMatcher>,
    text: String,
    token: CancellationToken,
) -> PathSignal {
    tracing::debug!(%text, "regex_global path entered");
    if token.is_cancelled() {
        tracing::warn!("regex_global cancelled before starting");
        return PathSignal::RegexGlobal(None);
    }
    let outcome = matcher.match_global(&text);
    if token.is_cancelled() {
        tracing::warn!("regex_global cancelled before reporting result");
        return PathSignal::RegexGlobal(None);
    }
    PathSignal::RegexGlobal(outcome)
}

/// D: domain classification via embedding similarity.
pub async fn run_domain_classify(
    classifier: Arc<DomainClassifier>,
    text: String,
    token: CancellationToken,
) -> PathSignal {
    tracing::debug!(%text, "domain_classify path entered");
    if token.is_cancelled() {
        tracing::warn!("domain_classify cancelled before starting");
        return PathSignal::DomainClassified(None);
    }
    let result = classifier.classify(&text).await;
    if token.is_cancelled() {
        tracing::warn!("domain_classify cancelled before reporting result");
        return PathSignal::DomainClassified(None);
    }
    match result {
        Ok(pair) => PathSignal::DomainClassified(Some(pair)),
        Err(err) => {
            tracing::warn!(error = %err, "domain classification failed, path yields no result");
            PathSignal::DomainClassified(None)
        }
    }
}

/// R: regex match restricted to a resolved domain.
pub async fn run_regex_domain(
    matcher: Arc<RegexMatcher>,
    text: String,
    domain: String,
    token: CancellationToken,
) -> PathSignal {
    tracing::debug!(%text, %domain, "regex_domain path entered");
    if token.is_cancelled() {
        tracing::warn!(%domain, "regex_domain cancelled before starting");
        return PathSignal::RegexDomain(None);
    }
    let outcome = matcher.match_domain(&text, &domain);
    if token.is_cancelled() {
        tracing::warn!(%domain, "regex_domain cancelled before reporting result");
        return PathSignal::RegexDomain(None);
    }
    PathSignal::RegexDomain(outcome)
}

/// M: intent matcher restricted to a resolved domain.
pub async fn run_model(
    intent_matcher: Arc<IntentMatcher>,
    text: String,
    domain: String,
    token: CancellationToken,
) -> PathSignal {
    tracing::debug!(%text, %domain, "model path entered");
    if token.is_cancelled() {
        tracing::warn!(%domain, "model cancelled before starting");
        return PathSignal::Model(None);
    }
    let result = intent_matcher.predict(&text, &domain).await;
    if token.is_cancelled() {
        tracing::warn!(%domain, "model cancelled before reporting result");
        return PathSignal::Model(None);
    }
    match result {
        Ok(prediction) => PathSignal::Model(Some(prediction)),
        Err(err) => {
            tracing::warn!(error = %err, "intent matching failed, path yields no result");
            PathSignal::Model(None)
        }
    }
}
