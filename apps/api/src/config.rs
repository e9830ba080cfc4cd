use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use crate::persona::{AvailabilityStatus, PersonaConfig};

/// Application configuration loaded from environment variables.
///
/// A missing `GEMINI_API_KEY` is not a startup failure: the provider client is
/// built without a credential and every AI call degrades to its fixed
/// "not configured" result instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub request_timeout_secs: u64,
    /// Durable cache backend. Falls back to an in-process store when unset.
    pub redis_url: Option<String>,
    pub persona: PersonaConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let availability: AvailabilityStatus = optional_env("AVAILABILITY_STATUS")
            .unwrap_or_else(|| "online".to_string())
            .parse()
            .context("AVAILABILITY_STATUS must be one of online, busy, away")?;

        let mut persona = PersonaConfig::with_status(availability);
        if let Some(trigger) = optional_env("HANDOFF_TRIGGER") {
            persona.handoff_trigger = trigger;
        }
        if let Some(number) = optional_env("WA_NUMBER") {
            persona.wa_number = number;
        }
        if let Some(template) = optional_env("WA_TEMPLATE") {
            persona.wa_template = template;
        }
        if let Some(message) = optional_env("NOT_CONFIGURED_MESSAGE") {
            persona.not_configured_message = message;
        }
        if let Some(message) = optional_env("LATENCY_MESSAGE") {
            persona.latency_message = message;
        }

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            text_model: optional_env("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: optional_env("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            redis_url: optional_env("REDIS_URL"),
            persona,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
