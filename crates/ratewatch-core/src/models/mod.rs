//! Data models and configuration.

pub mod config;
pub mod record;

pub use config::{Credentials, ExtractionMode, RateWatchConfig};
pub use record::{CompletenessScore, RateRecord, COMPLETENESS_TOTAL};
