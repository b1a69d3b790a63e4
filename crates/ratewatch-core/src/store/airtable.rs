//! Airtable REST table as a record store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{RecordStore, StoreAction};
use crate::error::{RateWatchError, StoreError, truncate_body};
use crate::models::config::{Credentials, StoreConfig};
use crate::models::record::RateRecord;

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AirtableConfig {
    /// Combine the store section with the store credentials.
    pub fn from_config(store: &StoreConfig, credentials: &Credentials) -> crate::error::Result<Self> {
        let (api_key, base_id) = credentials.require_store()?;
        Ok(Self {
            api_key: api_key.to_string(),
            base_id: base_id.to_string(),
            table: store.table.clone(),
            base_url: store.api_base_url.clone(),
            timeout: Duration::from_secs(store.timeout_secs),
        })
    }
}

pub struct AirtableStore {
    client: reqwest::Client,
    api_key: String,
    table_url: Url,
}

impl AirtableStore {
    pub fn new(config: AirtableConfig) -> Result<Self, StoreError> {
        let mut table_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        table_url
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(config.base_url.clone()))?
            .pop_if_empty()
            .push(&config.base_id)
            .push(&config.table);

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: config.api_key,
            table_url,
        })
    }

    /// Build from configuration, mapping every failure to a configuration error.
    pub fn from_config(store: &StoreConfig, credentials: &Credentials) -> crate::error::Result<Self> {
        let config = AirtableConfig::from_config(store, credentials)?;
        Self::new(config).map_err(|e| RateWatchError::Config(e.to_string()))
    }

    fn record_url(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    /// Id of the row whose `Bank Name` equals `bank_name`.
    async fn find(&self, bank_name: &str) -> Result<Option<String>, StoreError> {
        let formula = format!("{{Bank Name}} = \"{}\"", escape_formula(bank_name));

        let response = self
            .client
            .get(self.table_url.clone())
            .bearer_auth(&self.api_key)
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .send()
            .await?;
        let body = read_json(response).await?;

        Ok(body
            .get("records")
            .and_then(|v| v.as_array())
            .and_then(|records| records.first())
            .and_then(|r| r.get("id"))
            .and_then(|id| id.as_str())
            .map(|id| id.to_string()))
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn upsert(&self, record: &RateRecord) -> Result<StoreAction, StoreError> {
        let bank_name = record.bank_name.as_deref().ok_or(StoreError::MissingKey)?;
        let payload = json!({ "fields": record.populated_fields() });

        let existing = self.find(bank_name).await?;
        debug!(bank = bank_name, existing = ?existing, "looked up stored record");

        let action = match existing {
            Some(id) => {
                let response = self
                    .client
                    .patch(self.record_url(&id))
                    .bearer_auth(&self.api_key)
                    .json(&payload)
                    .send()
                    .await?;
                read_json(response).await?;
                StoreAction::Updated(id)
            }
            None => {
                let response = self
                    .client
                    .post(self.table_url.clone())
                    .bearer_auth(&self.api_key)
                    .json(&payload)
                    .send()
                    .await?;
                let body = read_json(response).await?;
                let id = body.get("id").and_then(|v| v.as_str()).unwrap_or_default();
                StoreAction::Created(id.to_string())
            }
        };

        info!(bank = bank_name, ?action, "stored rate record");
        Ok(action)
    }
}

async fn read_json(response: Response) -> Result<Value, StoreError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::Server {
            status: status.as_u16(),
            body: truncate_body(&text, 500),
        });
    }
    Ok(serde_json::from_str(&text)?)
}

fn escape_formula(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
