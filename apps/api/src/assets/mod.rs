//! Decorative image generation. Failures resolve to `None`, never an error, so
//! batch callers can drop them without aborting.

pub mod background;
pub mod handlers;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::join_all;
use tracing::warn;

use crate::llm_client::prompts::asset_prompt;
use crate::llm_client::{AiError, GenerateRequest, GenerativeModel};

pub use self::background::{BackgroundArt, BackgroundLoader};

#[derive(Clone)]
pub struct AssetSynthesizer {
    model: Arc<dyn GenerativeModel>,
}

impl AssetSynthesizer {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Generates one image in the house style and returns it as a PNG data URI.
    pub async fn generate_comic_asset(&self, prompt: &str) -> Option<String> {
        match self.try_generate(prompt).await {
            Ok(uri) => Some(uri),
            Err(e) => {
                warn!("Asset generation failed: {e}");
                None
            }
        }
    }

    /// Runs every prompt concurrently. Output order matches `prompts`.
    pub async fn generate_batch(&self, prompts: &[&str]) -> Vec<Option<String>> {
        join_all(prompts.iter().map(|prompt| self.generate_comic_asset(prompt))).await
    }

    async fn try_generate(&self, prompt: &str) -> Result<String, AiError> {
        let response = self
            .model
            .generate(GenerateRequest::image(asset_prompt(prompt)))
            .await?;

        let image = response
            .first_inline_image()
            .ok_or_else(|| AiError::MalformedResponse("no inline image part".to_string()))?;
        let bytes = BASE64
            .decode(image.data.trim().as_bytes())
            .map_err(|e| AiError::MalformedResponse(format!("image base64 decode failed: {e}")))?;

        Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
    }
}
