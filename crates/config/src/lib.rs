//! Settings loading and on-disk document parsing for the cabin NLU pipeline.

pub mod documents;
pub mod error;
pub mod settings;

pub use documents::{load_json, load_json_dir};
pub use error::ConfigError;
pub use settings::{load_settings, CacheConfig, DocumentPaths, Settings};
