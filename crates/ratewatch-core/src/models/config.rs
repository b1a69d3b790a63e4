//! Configuration structures for the extraction service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RateWatchError, Result};

/// Environment variable holding the extraction endpoint API key.
pub const EXTRACTION_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the record store API key.
pub const STORE_KEY_VAR: &str = "AIRTABLE_API_KEY";
/// Environment variable holding the record store base identifier.
pub const STORE_BASE_VAR: &str = "AIRTABLE_BASE_ID";

/// Main configuration for ratewatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateWatchConfig {
    /// LLM extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Optional JSON file replacing the built-in bank registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,
}

/// How the document reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Send the raw document bytes to a multimodal model.
    #[default]
    Vision,
    /// Send text extracted locally from the PDF.
    Text,
}

/// LLM extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Base URL of the generative language API.
    pub api_base_url: String,

    /// Model name used for `generateContent`.
    pub model: String,

    /// Vision or text mode for the model call.
    pub mode: ExtractionMode,

    /// Sampling temperature.
    pub temperature: f32,

    /// Upper bound on reply tokens.
    pub max_output_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Characters of document text sent in text mode.
    pub text_prefix_chars: usize,

    /// Run the local regex extractor when the model path fails on a PDF.
    pub regex_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            mode: ExtractionMode::Vision,
            temperature: 0.02,
            max_output_tokens: 3000,
            timeout_secs: 60,
            text_prefix_chars: 12_000,
            regex_fallback: true,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Persist successful extractions.
    pub enabled: bool,

    /// Base URL of the Airtable REST API.
    pub api_base_url: String,

    /// Table holding one row per bank.
    pub table: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base_url: "https://api.airtable.com/v0".to_string(),
            table: "Bank Interest Rates".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,

    /// Path of the extraction endpoint.
    pub route: String,

    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            route: "/api/parse-pdf".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl RateWatchConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            RateWatchError::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RateWatchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Secrets read from the environment, never from the config file.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Extraction endpoint API key.
    pub extraction_key: Option<String>,
    /// Record store API key.
    pub store_key: Option<String>,
    /// Record store base identifier.
    pub store_base_id: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment. Empty values count as unset.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            extraction_key: read(EXTRACTION_KEY_VAR),
            store_key: read(STORE_KEY_VAR),
            store_base_id: read(STORE_BASE_VAR),
        }
    }

    /// The extraction key, or a configuration error naming the variable to set.
    pub fn require_extraction_key(&self) -> Result<&str> {
        self.extraction_key.as_deref().ok_or_else(|| {
            RateWatchError::Config(format!(
                "{EXTRACTION_KEY_VAR} is not set; add it to the environment of the service"
            ))
        })
    }

    /// Store key and base id, or a configuration error naming what is missing.
    pub fn require_store(&self) -> Result<(&str, &str)> {
        match (self.store_key.as_deref(), self.store_base_id.as_deref()) {
            (Some(key), Some(base)) => Ok((key, base)),
            (None, _) => Err(RateWatchError::Config(format!(
                "{STORE_KEY_VAR} is not set but persistence is enabled"
            ))),
            (_, None) => Err(RateWatchError::Config(format!(
                "{STORE_BASE_VAR} is not set but persistence is enabled"
            ))),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("extraction_key", &mask(&self.extraction_key))
            .field("store_key", &mask(&self.store_key))
            .field("store_base_id", &mask(&self.store_base_id))
            .finish()
    }
}
