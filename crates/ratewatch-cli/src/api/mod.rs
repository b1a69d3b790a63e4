//! HTTP API for rate sheet extraction.
//!
//! A single JSON endpoint accepts `{ filename, content, mimeType? }`, runs the
//! extraction pipeline and optionally persists the accepted record.

pub mod error;
pub mod handler;
pub mod router;

use std::sync::Arc;

use tracing::warn;

use ratewatch_core::{
    AirtableStore, BankRegistry, Credentials, RatePipeline, RateWatchConfig, RecordStore,
};

pub use router::build_router;

/// Whether accepted records are written to the record store.
pub enum Persistence {
    Disabled,
    Ready(Box<dyn RecordStore>),
    /// Enabled but unusable; every request reports this message.
    Unavailable(String),
}

struct Services {
    pipeline: Result<RatePipeline, String>,
    persistence: Persistence,
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Services>,
}

impl AppState {
    pub fn new(pipeline: RatePipeline, persistence: Persistence) -> Self {
        Self {
            inner: Arc::new(Services {
                pipeline: Ok(pipeline),
                persistence,
            }),
        }
    }

    /// Build services from configuration.
    ///
    /// Missing credentials do not stop the server: the affected requests
    /// answer with a configuration error naming what to set.
    pub fn from_config(
        config: &RateWatchConfig,
        credentials: &Credentials,
        registry: Arc<BankRegistry>,
    ) -> Self {
        let pipeline = RatePipeline::new(config, credentials, registry).map_err(|e| {
            warn!(error = %e, "extraction is unavailable");
            e.to_string()
        });

        let persistence = if config.store.enabled {
            match AirtableStore::from_config(&config.store, credentials) {
                Ok(store) => Persistence::Ready(Box::new(store)),
                Err(e) => {
                    warn!(error = %e, "persistence is unavailable");
                    Persistence::Unavailable(e.to_string())
                }
            }
        } else {
            Persistence::Disabled
        };

        Self {
            inner: Arc::new(Services {
                pipeline,
                persistence,
            }),
        }
    }

    pub(crate) fn pipeline(&self) -> Result<&RatePipeline, &str> {
        self.inner.pipeline.as_ref().map_err(String::as_str)
    }

    pub(crate) fn persistence(&self) -> &Persistence {
        &self.inner.persistence
    }
}
