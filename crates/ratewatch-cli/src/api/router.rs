//! Router for the extraction endpoint.
//!
//! Layers (outermost first): CORS, request tracing, body limit.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ratewatch_core::models::config::ServerConfig;

use super::AppState;
use super::handler;

/// Build the API router for the configured route.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            &server.route,
            post(handler::parse)
                .options(handler::preflight)
                .fallback(handler::method_not_allowed),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use ratewatch_core::classify::encode_content;
    use ratewatch_core::store::AirtableConfig;
    use ratewatch_core::{
        AirtableStore, BankRegistry, Credentials, RatePipeline, RateWatchConfig,
    };

    use crate::api::Persistence;

    const ROUTE: &str = "/api/parse-pdf";
    const GEMINI_PATH: &str = "/models/gemini-1.5-flash:generateContent";
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn config(server: &Server) -> RateWatchConfig {
        let mut config = RateWatchConfig::default();
        config.extraction.api_base_url = server.url();
        config
    }

    fn credentials() -> Credentials {
        Credentials {
            extraction_key: Some("test-key".into()),
            ..Default::default()
        }
    }

    fn app(state: AppState) -> Router {
        build_router(state, &RateWatchConfig::default().server)
    }

    fn app_for(server: &Server, persistence: Persistence) -> Router {
        let pipeline =
            RatePipeline::new(&config(server), &credentials(), BankRegistry::builtin()).unwrap();
        app(AppState::new(pipeline, persistence))
    }

    fn gemini_reply(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }]
        })
        .to_string()
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(ROUTE)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn extracts_and_fills_known_website() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", GEMINI_PATH)
            .with_status(200)
            .with_body(gemini_reply(
                "```json\n{\"Bank Name\": \"ABSA Bank Botswana\", \"Savings Min\": \"1.50%\", \"Website\": null}\n```",
            ))
            .create_async()
            .await;

        let response = app_for(&server, Persistence::Disabled)
            .oneshot(post_json(json!({
                "filename": "ABSA_rates_March2026.png",
                "content": encode_content(PNG),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["Website"], "https://www.absa.co.bw");
        assert_eq!(json["data"]["Savings Min"], 1.5);
        assert_eq!(json["quality"], 7);
        assert_eq!(
            json["message"],
            "Extracted 3/44 fields (7% complete). Review and approve."
        );
        assert_eq!(json["source"]["strategy"], "llm");
        assert_eq!(json["source"]["bankId"], "ABSA");
        assert_eq!(json["source"]["mimeType"], "image/png");
        assert!(json.get("persisted").is_none());
    }

    #[tokio::test]
    async fn missing_content_is_400() {
        let server = Server::new_async().await;
        let response = app_for(&server, Persistence::Disabled)
            .oneshot(post_json(json!({ "filename": "fnb.pdf" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Missing filename or content");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .method("POST")
            .uri(ROUTE)
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app_for(&server, Persistence::Disabled).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_base64_is_400() {
        let server = Server::new_async().await;
        let response = app_for(&server, Persistence::Disabled)
            .oneshot(post_json(json!({ "filename": "fnb.pdf", "content": "%%%" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid request");
    }

    #[tokio::test]
    async fn other_methods_are_405() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .method("GET")
            .uri(ROUTE)
            .body(Body::empty())
            .unwrap();
        let response = app_for(&server, Persistence::Disabled).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn options_is_200() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri(ROUTE)
            .body(Body::empty())
            .unwrap();
        let response = app_for(&server, Persistence::Disabled).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri(ROUTE)
            .header("origin", "https://rates.example.org")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app_for(&server, Persistence::Disabled).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn unknown_bank_without_data_hints_at_rename() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", GEMINI_PATH)
            .with_status(200)
            .with_body(gemini_reply("{\"Savings Min\": 1.0}"))
            .create_async()
            .await;

        let response = app_for(&server, Persistence::Disabled)
            .oneshot(post_json(json!({
                "filename": "scan_0042.jpg",
                "content": encode_content(b"\xFF\xD8\xFF\xE0rest"),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Could not extract data from this file");
        assert!(json["hint"].as_str().unwrap().contains("Rename the file"));
    }

    #[tokio::test]
    async fn image_transport_failure_is_500() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", GEMINI_PATH)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let response = app_for(&server, Persistence::Disabled)
            .oneshot(post_json(json!({
                "filename": "fnb_rates.jpg",
                "content": encode_content(b"\xFF\xD8\xFF\xE0rest"),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Processing failed");
    }

    #[tokio::test]
    async fn textless_pdf_transport_failure_is_500() {
        let mut server = Server::new_async().await;
        let gemini = server
            .mock("POST", GEMINI_PATH)
            .with_status(503)
            .with_body("overloaded")
            .expect(1)
            .create_async()
            .await;

        let response = app_for(&server, Persistence::Disabled)
            .oneshot(post_json(json!({
                "filename": "fnb_rates.pdf",
                "content": encode_content(b"%PDF-1.4 scanned pages only"),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Processing failed");
        assert!(json.get("hint").is_none());
        gemini.assert_async().await;
    }

    #[tokio::test]
    async fn missing_extraction_key_is_500() {
        let state = AppState::from_config(
            &RateWatchConfig::default(),
            &Credentials::default(),
            BankRegistry::builtin(),
        );
        let response = app(state)
            .oneshot(post_json(json!({
                "filename": "fnb.pdf",
                "content": encode_content(b"%PDF-1.4"),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Service is not configured");
        assert!(json["details"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn persists_accepted_record() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", GEMINI_PATH)
            .with_status(200)
            .with_body(gemini_reply("{\"Bank Name\": \"First National Bank Botswana\", \"Prime Lending Rate\": 6.76}"))
            .create_async()
            .await;
        server
            .mock("GET", Matcher::Regex(r"^/v0/appTest/BankRates".into()))
            .with_status(200)
            .with_body(r#"{"records":[]}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/v0/appTest/BankRates")
            .with_status(200)
            .with_body(r#"{"id":"recNew","fields":{}}"#)
            .create_async()
            .await;

        let store = AirtableStore::new(AirtableConfig {
            api_key: "key-test".into(),
            base_id: "appTest".into(),
            table: "BankRates".into(),
            base_url: format!("{}/v0", server.url()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let response = app_for(&server, Persistence::Ready(Box::new(store)))
            .oneshot(post_json(json!({
                "filename": "fnb_rates.png",
                "content": encode_content(PNG),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["persisted"],
            json!({ "action": "created", "id": "recNew" })
        );
        create.assert_async().await;
    }

    #[tokio::test]
    async fn unavailable_store_is_500_before_extraction() {
        let server = Server::new_async().await;
        let pipeline =
            RatePipeline::new(&config(&server), &credentials(), BankRegistry::builtin()).unwrap();
        let state = AppState::new(
            pipeline,
            Persistence::Unavailable("AIRTABLE_API_KEY is not set".into()),
        );

        let response = app(state)
            .oneshot(post_json(json!({
                "filename": "fnb.png",
                "content": encode_content(PNG),
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["details"]
            .as_str()
            .unwrap()
            .contains("AIRTABLE_API_KEY"));
    }
}
