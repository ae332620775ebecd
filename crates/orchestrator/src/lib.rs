//! Races the regex and embedding paths and returns the first acceptable
//! recognition result (spec §4.5).

pub mod error;
pub mod orchestrator;
pub mod signal;

pub use error::OrchestratorError;
pub use orchestrator::Orchestrator;
pub use signal::PathSignal;
