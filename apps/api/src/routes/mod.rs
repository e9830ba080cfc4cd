pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assets::handlers as assets;
use crate::news::handlers as news;
use crate::persona::handlers as persona;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Persona chat
        .route("/api/v1/chat", post(persona::handle_chat))
        .route("/api/v1/chat/:session_id", get(persona::handle_chat_history))
        .route("/api/v1/persona", get(persona::handle_persona_status))
        // News digest
        .route("/api/v1/news", get(news::handle_get_news))
        // Decorative assets
        .route("/api/v1/assets", post(assets::handle_generate_asset))
        .route("/api/v1/assets/background", get(assets::handle_background))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::AiError;
    use crate::persona::DEFAULT_LATENCY_MESSAGE;
    use crate::store::MemoryStore;
    use crate::test_support::{image_response, test_config, text_response, ScriptedModel};

    fn app(model: Arc<ScriptedModel>) -> Router {
        let state = AppState::new(
            test_config(Some("test-key")),
            model,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        );
        build_router(state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(ScriptedModel::new(vec![]))
            .oneshot(get("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let response = app(ScriptedModel::new(vec![]))
            .oneshot(post_json("/api/v1/chat", json!({ "message": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_chat_reply_is_recorded_in_history() {
        let router = app(ScriptedModel::new(vec![Ok(text_response(
            "Mostly Rust and TypeScript.",
        ))]));

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/chat",
                json!({ "message": "Which languages do you use?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reply"]["role"], "model");
        assert_eq!(body["reply"]["text"], "Mostly Rust and TypeScript.");
        assert_eq!(body["mode"], "reasoning");
        assert_eq!(body["needs_handoff"], false);

        let session_id = body["session_id"].as_str().unwrap().to_string();
        let history = router
            .oneshot(get(&format!("/api/v1/chat/{session_id}")))
            .await
            .unwrap();
        assert_eq!(history.status(), StatusCode::OK);
        let history = body_json(history).await;
        let turns = history["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[1]["role"], "model");
    }

    #[tokio::test]
    async fn test_chat_provider_failure_is_still_ok() {
        let router = app(ScriptedModel::new(vec![Err(AiError::ProviderRequestFailure {
            status: Some(500),
            message: "internal stack trace".to_string(),
        })]));
        let response = router
            .oneshot(post_json("/api/v1/chat", json!({ "message": "hello" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reply"]["text"], DEFAULT_LATENCY_MESSAGE);
        assert_eq!(body["needs_handoff"], true);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let response = app(ScriptedModel::new(vec![]))
            .oneshot(get(&format!("/api/v1/chat/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_news_without_cache_maps_failure_to_bad_gateway() {
        let response = app(ScriptedModel::new(vec![Ok(text_response("nothing today"))]))
            .oneshot(get("/api/v1/news"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "AI_ERROR");
        assert!(!body.to_string().contains("nothing today"));
    }

    #[tokio::test]
    async fn test_news_returns_articles() {
        let raw = r#"[{"title": "T", "summary": "S", "url": "https://t.dev", "publishedAt": "2026-10-15"}]"#;
        let response = app(ScriptedModel::new(vec![Ok(text_response(raw))]))
            .oneshot(get("/api/v1/news?refresh=true"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["articles"][0]["title"], "T");
        assert_eq!(body["articles"][0]["publishedAt"], "2026-10-15");
        assert!(body["lastUpdated"].is_i64());
    }

    #[tokio::test]
    async fn test_asset_failure_returns_null_data_uri() {
        let response = app(ScriptedModel::new(vec![Err(AiError::MissingCredential)]))
            .oneshot(post_json("/api/v1/assets", json!({ "prompt": "a gear" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["data_uri"].is_null());
    }

    #[tokio::test]
    async fn test_background_generates_assets() {
        let model = ScriptedModel::routed(|_| Ok(image_response("AAAA")));
        let response = app(model)
            .oneshot(get("/api/v1/assets/background"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "generated");
        assert_eq!(body["assets"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_persona_status_defaults_to_online() {
        let response = app(ScriptedModel::new(vec![]))
            .oneshot(get("/api/v1/persona"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "online");
        assert_eq!(body["handoff_available"], false);
    }
}
