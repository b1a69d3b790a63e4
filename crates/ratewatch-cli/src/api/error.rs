//! API error type and its JSON rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ratewatch_core::{ExtractionError, RateWatchError};

/// Error body: `{ error, details, hint? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing filename or content")]
    MissingField,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Could not extract data from this file: {details}")]
    Unextractable { details: String, hint: String },
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Service is not configured: {0}")]
    NotConfigured(String),
    #[error("Processing failed: {0}")]
    Processing(String),
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

impl ApiError {
    /// Map a failed extraction, hinting at a fix based on whether the bank was recognized.
    pub fn extraction(err: RateWatchError, bank: Option<&str>) -> Self {
        match err {
            RateWatchError::Extraction(
                e @ (ExtractionError::EmptyResponse { .. }
                | ExtractionError::MalformedResponse { .. }
                | ExtractionError::InsufficientData { .. }),
            ) => Self::Unextractable {
                details: e.to_string(),
                hint: remediation(bank),
            },
            other => other.into(),
        }
    }
}

fn remediation(bank: Option<&str>) -> String {
    match bank {
        Some(name) => format!(
            "The document for \"{name}\" could not be read. Try uploading a clearer scan or screenshot (JPG/PNG)."
        ),
        None => "Bank not detected from filename. Rename the file to include the bank name \
                 (e.g. \"FNB_March2026.pdf\") and try again."
            .to_string(),
    }
}

impl From<RateWatchError> for ApiError {
    fn from(err: RateWatchError) -> Self {
        match err {
            RateWatchError::Config(detail) => Self::NotConfigured(detail),
            RateWatchError::InvalidRequest(detail) => Self::BadRequest(detail),
            RateWatchError::Store(e) => Self::Persistence(e.to_string()),
            other => Self::Processing(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details, hint) = match self {
            ApiError::MissingField => (
                StatusCode::BAD_REQUEST,
                "Missing filename or content",
                None,
                None,
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "Invalid request", Some(detail), None)
            }
            ApiError::Unextractable { details, hint } => (
                StatusCode::BAD_REQUEST,
                "Could not extract data from this file",
                Some(details),
                Some(hint),
            ),
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None, None)
            }
            ApiError::NotConfigured(detail) => {
                tracing::error!(detail, "service is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service is not configured",
                    Some(detail),
                    None,
                )
            }
            ApiError::Processing(detail) => {
                tracing::error!(detail, "processing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Processing failed", Some(detail), None)
            }
            ApiError::Persistence(detail) => {
                tracing::error!(detail, "persistence failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Persistence failed", Some(detail), None)
            }
        };

        let body = ErrorBody {
            error: error.to_string(),
            details,
            hint,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn method_not_allowed_body() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Method not allowed" })
        );
    }

    #[tokio::test]
    async fn insufficient_data_hints_at_rename_without_bank() {
        let err = RateWatchError::Extraction(ExtractionError::InsufficientData {
            reason: "no bank name could be resolved".into(),
        });
        let response = ApiError::extraction(err, None).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Could not extract data from this file");
        assert!(json["hint"].as_str().unwrap().contains("Rename the file"));
    }

    #[tokio::test]
    async fn malformed_reply_hints_at_clearer_scan_with_bank() {
        let err = RateWatchError::Extraction(ExtractionError::MalformedResponse {
            snippet: "sorry".into(),
        });
        let json = body_json(ApiError::extraction(err, Some("ABSA Bank Botswana")).into_response()).await;
        let hint = json["hint"].as_str().unwrap();
        assert!(hint.contains("ABSA Bank Botswana"));
        assert!(hint.contains("JPG/PNG"));
    }

    #[tokio::test]
    async fn transport_failure_is_500() {
        let err = RateWatchError::Extraction(ExtractionError::Transport {
            status: Some(503),
            body: "unavailable".into(),
        });
        let response = ApiError::extraction(err, Some("ABSA Bank Botswana")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Processing failed");
        assert!(json.get("hint").is_none());
    }

    #[tokio::test]
    async fn config_error_names_the_variable() {
        let err = RateWatchError::Config("GEMINI_API_KEY is not set".into());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["details"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }
}
