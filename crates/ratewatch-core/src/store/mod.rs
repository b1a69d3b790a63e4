//! Persistence of accepted records, keyed by bank name.

mod airtable;

pub use airtable::{AirtableConfig, AirtableStore};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::record::RateRecord;

/// What an upsert did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum StoreAction {
    Created(String),
    Updated(String),
}

impl StoreAction {
    pub fn id(&self) -> &str {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// A table of one row per bank.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Update the row whose `Bank Name` equals the record's, or create one.
    /// Only non-absent fields are written.
    async fn upsert(&self, record: &RateRecord) -> Result<StoreAction, StoreError>;
}
