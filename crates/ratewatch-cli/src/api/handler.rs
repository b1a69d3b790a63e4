//! Extraction endpoint handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use ratewatch_core::{ExtractionRequest, MimeType, RateRecord, StoreAction};

use super::error::ApiError;
use super::{AppState, Persistence};

/// Request body. Fields are optional so that absence maps to a 400, not a rejection.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub filename: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

/// Where the record came from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub strategy: &'static str,
    pub bank_id: Option<String>,
    pub mime_type: MimeType,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub message: String,
    pub quality: u8,
    pub data: RateRecord,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<StoreAction>,
}

pub async fn parse(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ParseResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let (filename, content) = match (body.filename, body.content) {
        (Some(f), Some(c)) if !f.trim().is_empty() && !c.trim().is_empty() => (f, c),
        _ => return Err(ApiError::MissingField),
    };

    let pipeline = state
        .pipeline()
        .map_err(|detail| ApiError::NotConfigured(detail.to_string()))?;
    if let Persistence::Unavailable(detail) = state.persistence() {
        return Err(ApiError::NotConfigured(detail.clone()));
    }

    let mut request = ExtractionRequest::new(filename, content);
    request.mime_type = body.mime_type;

    let document = pipeline.prepare(&request)?;
    let bank = document.profile.as_ref().map(|p| p.display_name.clone());
    let outcome = pipeline
        .extract(&document)
        .await
        .map_err(|e| ApiError::extraction(e, bank.as_deref()))?;

    let persisted = match state.persistence() {
        Persistence::Ready(store) => Some(
            store
                .upsert(&outcome.record)
                .await
                .map_err(|e| ApiError::Persistence(e.to_string()))?,
        ),
        Persistence::Disabled | Persistence::Unavailable(_) => None,
    };

    let score = outcome.completeness;
    info!(
        filename = %document.filename,
        filled = score.filled,
        quality = score.percent,
        persisted = persisted.is_some(),
        "request completed"
    );

    Ok(Json(ParseResponse {
        success: true,
        message: format!(
            "Extracted {}/{} fields ({}% complete). Review and approve.",
            score.filled, score.total, score.percent
        ),
        quality: score.percent,
        data: outcome.record,
        source: Source {
            strategy: outcome.strategy,
            bank_id: outcome.bank_id,
            mime_type: outcome.mime,
        },
        persisted,
    }))
}

/// Bare `OPTIONS` without CORS preflight headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
