//! Error types for the ratewatch-core library.

use thiserror::Error;

/// Main error type for the ratewatch library.
#[derive(Error, Debug)]
pub enum RateWatchError {
    /// Configuration error (missing credential, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller sent something we cannot work with.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Rate extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised by a single extraction strategy.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Non-2xx status or network failure from the extraction endpoint.
    #[error("extraction endpoint failed ({}): {body}", describe_status(.status))]
    Transport { status: Option<u16>, body: String },

    /// The endpoint answered but produced no candidate text.
    #[error("extraction endpoint returned no text (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    EmptyResponse {
        finish_reason: Option<String>,
        detail: Option<String>,
    },

    /// The reply did not contain a parseable JSON object.
    #[error("no JSON object in model reply: {snippet}")]
    MalformedResponse { snippet: String },

    /// A record was produced but lacks a bank name or any rate.
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "network error".to_string(),
    }
}

/// Errors related to the external record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("store returned {status}: {body}")]
    Server { status: u16, body: String },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The record has no bank name to key on.
    #[error("record has no bank name")]
    MissingKey,

    /// The configured store URL is unusable.
    #[error("invalid store URL: {0}")]
    InvalidUrl(String),
}

/// Result type for the ratewatch library.
pub type Result<T> = std::result::Result<T, RateWatchError>;

/// Truncate a response body for inclusion in an error.
pub(crate) fn truncate_body(body: &str, limit: usize) -> String {
    if body.chars().count() <= limit {
        return body.to_string();
    }
    let mut out: String = body.chars().take(limit).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        let err = ExtractionError::Transport {
            status: Some(503),
            body: "overloaded".into(),
        };
        assert_eq!(
            err.to_string(),
            "extraction endpoint failed (status 503): overloaded"
        );

        let err = ExtractionError::Transport {
            status: None,
            body: "connection refused".into(),
        };
        assert!(err.to_string().contains("network error"));
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short", 10), "short");
        let long = "x".repeat(20);
        let cut = truncate_body(&long, 5);
        assert_eq!(cut.chars().count(), 6);
        assert!(cut.ends_with('…'));
    }
}
