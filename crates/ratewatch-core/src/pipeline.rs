//! Extraction pipeline: an ordered chain of strategies followed by the
//! knowledge merge and the sufficiency check.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::{MimeType, decode_content, detect_mime_type};
use crate::error::{ExtractionError, RateWatchError, Result, truncate_body};
use crate::llm::{ExtractionPayload, GeminiClient, GeminiConfig, LlmClient};
use crate::merge::apply_knowledge;
use crate::models::config::{Credentials, ExtractionMode, RateWatchConfig};
use crate::models::record::{CompletenessScore, RateRecord};
use crate::normalize::normalize_reply;
use crate::pdf::{PdfExtractor, PdfType};
use crate::prompt::{build_prompt, build_text_prompt};
use crate::registry::{BankProfile, BankRegistry};
use crate::rules::RegexExtractor;

/// One document submitted for extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub filename: String,
    /// Base64 document bytes, optionally as a `data:` URL.
    pub content: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ExtractionRequest {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            mime_type: None,
        }
    }

    /// Build a request from raw bytes read locally.
    pub fn from_bytes(filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(filename, crate::classify::encode_content(bytes))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A decoded, classified document with its resolved bank.
#[derive(Debug)]
pub struct SourceDocument {
    pub filename: String,
    pub mime: MimeType,
    pub bytes: Vec<u8>,
    pub base64: String,
    pub profile: Option<BankProfile>,
    min_text_length: usize,
    text: OnceLock<Option<String>>,
}

impl SourceDocument {
    /// Plain text of a text-based PDF, extracted on first use.
    pub fn text(&self) -> Option<&str> {
        self.text.get_or_init(|| self.load_text()).as_deref()
    }

    fn load_text(&self) -> Option<String> {
        if self.mime != MimeType::Pdf {
            return None;
        }
        match PdfExtractor::read(&self.bytes, self.min_text_length) {
            Ok(content) if content.pdf_type == PdfType::Text => {
                debug!(chars = content.text.len(), pages = content.page_count, "extracted PDF text");
                Some(content.text)
            }
            Ok(content) => {
                debug!(pdf_type = ?content.pdf_type, "PDF has no usable text");
                None
            }
            Err(e) => {
                warn!(error = %e, filename = %self.filename, "could not read PDF text");
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn with_text(self, text: &str) -> Self {
        let _ = self.text.set(Some(text.to_string()));
        self
    }
}

/// One way of turning a document into a record.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self, document: &SourceDocument) -> bool;

    async fn extract(&self, document: &SourceDocument) -> std::result::Result<RateRecord, ExtractionError>;
}

/// Ask the model, by document bytes or by extracted text.
pub struct LlmStrategy {
    client: Arc<dyn LlmClient>,
    mode: ExtractionMode,
    text_prefix_chars: usize,
}

impl LlmStrategy {
    pub fn new(client: Arc<dyn LlmClient>, mode: ExtractionMode, text_prefix_chars: usize) -> Self {
        Self {
            client,
            mode,
            text_prefix_chars,
        }
    }

    /// Text mode falls back to vision when the document has no text.
    fn request_for(&self, document: &SourceDocument) -> (ExtractionPayload, String) {
        let profile = document.profile.as_ref();
        if self.mode == ExtractionMode::Text {
            if let Some(text) = document.text() {
                let prefix = char_prefix(text, self.text_prefix_chars);
                return (ExtractionPayload::Text, build_text_prompt(profile, prefix));
            }
            debug!(filename = %document.filename, "no text available, sending document bytes");
        }

        let payload = ExtractionPayload::Vision {
            mime: document.mime,
            data_base64: document.base64.clone(),
        };
        (payload, build_prompt(profile))
    }
}

#[async_trait]
impl ExtractionStrategy for LlmStrategy {
    fn name(&self) -> &'static str {
        "llm"
    }

    fn applies_to(&self, _document: &SourceDocument) -> bool {
        true
    }

    async fn extract(&self, document: &SourceDocument) -> std::result::Result<RateRecord, ExtractionError> {
        let (payload, prompt) = self.request_for(document);
        let reply = self.client.generate(&payload, &prompt).await?;

        normalize_reply(&reply).ok_or_else(|| ExtractionError::MalformedResponse {
            snippet: truncate_body(reply.trim(), 200),
        })
    }
}

/// Local pattern matching over PDF text.
pub struct RegexStrategy {
    extractor: RegexExtractor,
}

impl RegexStrategy {
    pub fn new(registry: Arc<BankRegistry>) -> Self {
        Self {
            extractor: RegexExtractor::new(registry),
        }
    }
}

#[async_trait]
impl ExtractionStrategy for RegexStrategy {
    fn name(&self) -> &'static str {
        "regex"
    }

    /// Only documents with extractable text; a scanned PDF keeps the earlier error.
    fn applies_to(&self, document: &SourceDocument) -> bool {
        !document.mime.is_image() && document.text().is_some()
    }

    async fn extract(&self, document: &SourceDocument) -> std::result::Result<RateRecord, ExtractionError> {
        let text = document.text().ok_or_else(|| ExtractionError::InsufficientData {
            reason: "the document has no extractable text".to_string(),
        })?;

        self.extractor
            .extract(text, &document.filename)
            .ok_or_else(|| ExtractionError::InsufficientData {
                reason: "no bank name or headline rate found in the document text".to_string(),
            })
    }
}

/// A successful extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub record: RateRecord,
    pub completeness: CompletenessScore,
    /// Name of the strategy that produced the record.
    pub strategy: &'static str,
    /// Registry id of the bank detected from the filename.
    pub bank_id: Option<String>,
    pub mime: MimeType,
}

pub struct RatePipeline {
    registry: Arc<BankRegistry>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    min_text_length: usize,
}

impl RatePipeline {
    /// Build the pipeline against the configured extraction endpoint.
    ///
    /// Fails with a configuration error when the extraction key is missing.
    pub fn new(
        config: &RateWatchConfig,
        credentials: &Credentials,
        registry: Arc<BankRegistry>,
    ) -> Result<Self> {
        let api_key = credentials.require_extraction_key()?;
        let client = GeminiClient::new(GeminiConfig::from_config(&config.extraction, api_key))?;
        Ok(Self::with_client(config, registry, Arc::new(client)))
    }

    /// Build the pipeline around any model client.
    pub fn with_client(
        config: &RateWatchConfig,
        registry: Arc<BankRegistry>,
        client: Arc<dyn LlmClient>,
    ) -> Self {
        let mut strategies: Vec<Box<dyn ExtractionStrategy>> = vec![Box::new(LlmStrategy::new(
            client,
            config.extraction.mode,
            config.extraction.text_prefix_chars,
        ))];
        if config.extraction.regex_fallback {
            strategies.push(Box::new(RegexStrategy::new(Arc::clone(&registry))));
        }

        Self {
            registry,
            strategies,
            min_text_length: config.pdf.min_text_length,
        }
    }

    pub fn registry(&self) -> &BankRegistry {
        &self.registry
    }

    /// Validate, decode and classify a request.
    pub fn prepare(&self, request: &ExtractionRequest) -> Result<SourceDocument> {
        let filename = request.filename.trim();
        if filename.is_empty() {
            return Err(RateWatchError::InvalidRequest("filename is required".to_string()));
        }
        if request.content.trim().is_empty() {
            return Err(RateWatchError::InvalidRequest("content is required".to_string()));
        }

        let decoded = decode_content(&request.content)?;
        let mime = request
            .mime_type
            .as_deref()
            .and_then(MimeType::parse)
            .or(decoded.data_url_mime)
            .unwrap_or_else(|| detect_mime_type(filename, Some(&decoded.bytes)));
        let profile = self.registry.detect(filename).cloned();

        info!(
            filename,
            %mime,
            bytes = decoded.bytes.len(),
            bank = profile.as_ref().map(|p| p.id.as_str()).unwrap_or("unknown"),
            "received document"
        );

        Ok(SourceDocument {
            filename: filename.to_string(),
            mime,
            bytes: decoded.bytes,
            base64: decoded.base64,
            profile,
            min_text_length: self.min_text_length,
            text: OnceLock::new(),
        })
    }

    /// Prepare and extract in one call.
    pub async fn run(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome> {
        let document = self.prepare(request)?;
        self.extract(&document).await
    }

    /// Try each applicable strategy in order; the first sufficient record wins.
    pub async fn extract(&self, document: &SourceDocument) -> Result<ExtractionOutcome> {
        let mut last_error = None;

        for strategy in &self.strategies {
            if !strategy.applies_to(document) {
                debug!(strategy = strategy.name(), "strategy does not apply");
                continue;
            }

            let mut record = match strategy.extract(document).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                    last_error = Some(e);
                    continue;
                }
            };

            apply_knowledge(&mut record, document.profile.as_ref(), &self.registry);

            if let Some(reason) = record.insufficiency() {
                warn!(strategy = strategy.name(), reason, "record is not usable");
                last_error = Some(ExtractionError::InsufficientData {
                    reason: reason.to_string(),
                });
                continue;
            }

            let completeness = record.completeness();
            info!(
                strategy = strategy.name(),
                filled = completeness.filled,
                percent = completeness.percent,
                "extraction succeeded"
            );
            return Ok(ExtractionOutcome {
                record,
                completeness,
                strategy: strategy.name(),
                bank_id: document.profile.as_ref().map(|p| p.id.clone()),
                mime: document.mime,
            });
        }

        let error = last_error.unwrap_or_else(|| ExtractionError::InsufficientData {
            reason: "no extraction strategy applies to this document".to_string(),
        });
        Err(error.into())
    }
}

fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
