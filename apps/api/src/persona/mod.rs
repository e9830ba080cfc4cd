//! Persona chat: mode classification, handoff detection and session logs.
//! All model calls go through llm_client.

pub mod classifier;
pub mod client;
pub mod conversation;
pub mod handlers;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::classifier::{classify, Mode};
pub use self::client::PersonaClient;
pub use self::conversation::ChatSessions;

pub const DEFAULT_HANDOFF_TRIGGER: &str = "[HANDOFF]";
pub const DEFAULT_NOT_CONFIGURED_MESSAGE: &str = "The assistant is not configured right now. \
    Please reach out directly and I'll reply to you personally.";
pub const DEFAULT_LATENCY_MESSAGE: &str = "I'm experiencing high latency right now. \
    Please try again in a moment, or reach out directly for a personal reply.";
pub const DEFAULT_WA_TEMPLATE: &str =
    "Hi! I was chatting with your portfolio assistant and would like a personal reply about: {question}";

/// Whether the site owner can pick up a handed-off conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[default]
    Online,
    Busy,
    Away,
}

#[derive(Debug, Error)]
#[error("unknown availability status '{0}'")]
pub struct UnknownStatus(String);

impl FromStr for AvailabilityStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "busy" => Ok(Self::Busy),
            "away" => Ok(Self::Away),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl AvailabilityStatus {
    fn away_message(self) -> &'static str {
        match self {
            Self::Online => "I'm online right now and usually reply within a few minutes.",
            Self::Busy => "I'm heads-down on a project today; expect a reply within a few hours.",
            Self::Away => "I'm away at the moment. Leave a message and I'll get back to you as soon as I'm back.",
        }
    }

    fn handoff_instruction(self) -> &'static str {
        match self {
            Self::Online => "The owner is online. When you hand off, tell the visitor they will hear back shortly.",
            Self::Busy => "The owner is busy. When you hand off, tell the visitor a reply may take a few hours.",
            Self::Away => "The owner is away. When you hand off, ask the visitor to leave a detailed message.",
        }
    }
}

/// Process-wide persona settings. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub handoff_trigger: String,
    pub availability_status: AvailabilityStatus,
    pub away_message: String,
    pub wa_number: String,
    /// Pre-filled handoff message; `{question}` is replaced with the visitor's input.
    pub wa_template: String,
    pub handoff_instruction: String,
    /// Shown when the provider credential is missing.
    pub not_configured_message: String,
    /// Shown for every other provider failure.
    pub latency_message: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self::with_status(AvailabilityStatus::default())
    }
}

impl PersonaConfig {
    /// Builds a config whose status-dependent messages match `status`.
    pub fn with_status(status: AvailabilityStatus) -> Self {
        Self {
            handoff_trigger: DEFAULT_HANDOFF_TRIGGER.to_string(),
            availability_status: status,
            away_message: status.away_message().to_string(),
            wa_number: String::new(),
            wa_template: DEFAULT_WA_TEMPLATE.to_string(),
            handoff_instruction: status.handoff_instruction().to_string(),
            not_configured_message: DEFAULT_NOT_CONFIGURED_MESSAGE.to_string(),
            latency_message: DEFAULT_LATENCY_MESSAGE.to_string(),
        }
    }

    /// WhatsApp deep link carrying the pre-filled handoff message.
    /// `None` when no number is configured.
    pub fn handoff_link(&self, question: &str) -> Option<String> {
        let number: String = self.wa_number.chars().filter(char::is_ascii_digit).collect();
        if number.is_empty() {
            return None;
        }
        let text = self.wa_template.replace("{question}", question.trim());
        reqwest::Url::parse_with_params(&format!("https://wa.me/{number}"), &[("text", text)])
            .ok()
            .map(String::from)
    }
}
