//! Core library for bank rate sheet extraction.
//!
//! This crate provides:
//! - Bank registry with filename detection and prompt hints
//! - Document classification and base64 decoding
//! - LLM extraction client (Gemini `generateContent`) and reply normalization
//! - Regex fallback extraction over PDF text
//! - Knowledge merge, strategy pipeline and completeness scoring
//! - Airtable record store

pub mod classify;
pub mod error;
pub mod llm;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod pdf;
pub mod pipeline;
pub mod prompt;
pub mod registry;
pub mod rules;
pub mod store;

pub use classify::{MimeType, decode_content, detect_mime_type};
pub use error::{ExtractionError, PdfError, RateWatchError, Result, StoreError};
pub use llm::{ExtractionPayload, GeminiClient, LlmClient};
pub use models::{CompletenessScore, Credentials, ExtractionMode, RateRecord, RateWatchConfig};
pub use pipeline::{ExtractionOutcome, ExtractionRequest, RatePipeline};
pub use registry::{BankProfile, BankRegistry};
pub use rules::RegexExtractor;
pub use store::{AirtableStore, RecordStore, StoreAction};
