//! Domain-indexed regex matcher with vocabulary-backed slot extraction.

pub mod document;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod rules;

pub use document::{DomainRuleFile, PatternDoc};
pub use error::MatcherError;
pub use matcher::{MatchOutcome, RegexMatcher};
pub use pattern::CompiledPattern;
pub use rules::{RuleSet, GLOBAL_DOMAIN};
