//! Fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::config::Config;
use crate::llm_client::{
    AiError, GenerateRequest, GenerateResponse, GenerativeModel, DEFAULT_API_BASE,
    DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
};
use crate::persona::PersonaConfig;

type Route = Box<dyn Fn(&str) -> Result<GenerateResponse, AiError> + Send + Sync>;

/// A `GenerativeModel` that replays scripted replies and records every request.
pub struct ScriptedModel {
    scripted: Mutex<VecDeque<Result<GenerateResponse, AiError>>>,
    route: Option<Route>,
    /// Sleep before replying, so concurrent callers overlap.
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    /// Replies in order; extra calls fail as provider errors.
    pub fn new(replies: Vec<Result<GenerateResponse, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(replies.into()),
            route: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(delay: Duration, replies: Vec<Result<GenerateResponse, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(replies.into()),
            route: None,
            delay: Some(delay),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Replies based on the prompt text, for concurrent batches.
    pub fn routed(
        route: impl Fn(&str) -> Result<GenerateResponse, AiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(VecDeque::new()),
            route: Some(Box::new(route)),
            delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn slow_routed(
        delay: Duration,
        route: impl Fn(&str) -> Result<GenerateResponse, AiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            scripted: Mutex::new(VecDeque::new()),
            route: Some(Box::new(route)),
            delay: Some(delay),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(route) = &self.route {
            return route(&request.prompt);
        }
        self.scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AiError::ProviderRequestFailure {
                    status: None,
                    message: "no scripted reply left".to_string(),
                })
            })
    }
}

pub fn text_response(text: &str) -> GenerateResponse {
    serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
    .unwrap()
}

/// Text reply with one web grounding chunk per uri, plus one non-web chunk.
pub fn grounded_text_response(text: &str, uris: &[&str]) -> GenerateResponse {
    let mut chunks: Vec<_> = uris
        .iter()
        .enumerate()
        .map(|(i, uri)| json!({ "web": { "uri": uri, "title": format!("Source {i}") } }))
        .collect();
    chunks.push(json!({ "retrievedContext": { "uri": "gs://internal" } }));
    serde_json::from_value(json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "groundingMetadata": { "groundingChunks": chunks }
        }]
    }))
    .unwrap()
}

pub fn image_response(data: &str) -> GenerateResponse {
    serde_json::from_value(json!({
        "candidates": [{ "content": { "parts": [
            { "text": "Here is your drawing." },
            { "inlineData": { "mimeType": "image/png", "data": data } }
        ]}}]
    }))
    .unwrap()
}

pub fn test_config(api_key: Option<&str>) -> Config {
    Config {
        gemini_api_key: api_key.map(str::to_string),
        gemini_api_base: DEFAULT_API_BASE.to_string(),
        text_model: DEFAULT_TEXT_MODEL.to_string(),
        image_model: DEFAULT_IMAGE_MODEL.to_string(),
        request_timeout_secs: 5,
        redis_url: None,
        persona: PersonaConfig::default(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}
