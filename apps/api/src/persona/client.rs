use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm_client::prompts::persona_system_instruction;
use crate::llm_client::{AiError, GenerateRequest, GenerativeModel};
use crate::models::ai::AiResult;
use crate::persona::classifier::{classify, Mode};
use crate::persona::PersonaConfig;

pub const GROUNDED_TEMPERATURE: f32 = 0.3;
pub const REASONING_TEMPERATURE: f32 = 0.8;
pub const REASONING_THINKING_BUDGET: u32 = 2048;

/// Phrase that forces a handoff even without the trigger token.
const PERSONAL_REPLY_PHRASE: &str = "reply to you personally";


/// Answers portfolio visitors in the owner's voice.
#[derive(Clone)]
pub struct PersonaClient {
    model: Arc<dyn GenerativeModel>,
}

impl PersonaClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Never fails: provider errors become an apology with `needs_handoff` set.
    pub async fn get_persona_response(&self, user_input: &str, config: &PersonaConfig) -> AiResult {
        let mode = classify(user_input);
        debug!("Persona request dispatched in {:?} mode", mode);

        match self.dispatch(user_input, mode, config).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Persona response degraded to fallback: {e}");
                let text = match e {
                    AiError::MissingCredential => &config.not_configured_message,
                    _ => &config.latency_message,
                };
                AiResult {
                    text: text.clone(),
                    needs_handoff: Some(true),
                    handoff_link: config.handoff_link(user_input),
                    ..AiResult::default()
                }
            }
        }
    }

    async fn dispatch(
        &self,
        user_input: &str,
        mode: Mode,
        config: &PersonaConfig,
    ) -> Result<AiResult, AiError> {
        let system =
            persona_system_instruction(&config.handoff_trigger, &config.handoff_instruction);
        let request = build_request(user_input, mode, system);

        let response = self.model.generate(request).await?;
        let raw = response.text();
        if raw.trim().is_empty() {
            return Err(AiError::EmptyResult);
        }

        let (text, needs_handoff) = detect_handoff(&raw, &config.handoff_trigger);
        let chunks: Vec<_> = response
            .grounding_chunks()
            .iter()
            .filter(|chunk| chunk.web.is_some())
            .cloned()
            .collect();

        Ok(AiResult {
            text,
            grounding_chunks: (!chunks.is_empty()).then_some(chunks),
            is_thinking: (mode == Mode::Reasoning).then_some(true),
            needs_handoff: needs_handoff.then_some(true),
            handoff_link: if needs_handoff {
                config.handoff_link(user_input)
            } else {
                None
            },
        })
    }
}

fn build_request(user_input: &str, mode: Mode, system: String) -> GenerateRequest {
    let request = GenerateRequest::text(user_input).with_system(system);
    match mode {
        Mode::Grounded => request.with_temperature(GROUNDED_TEMPERATURE).with_search(),
        Mode::Reasoning => request
            .with_temperature(REASONING_TEMPERATURE)
            .with_thinking_budget(REASONING_THINKING_BUDGET),
    }
}

/// Returns the visible text with every trigger token removed, and whether the
/// reply asks for a human handoff.
pub fn detect_handoff(raw: &str, trigger: &str) -> (String, bool) {
    let has_trigger = !trigger.is_empty() && raw.contains(trigger);
    let has_phrase = raw.to_lowercase().contains(PERSONAL_REPLY_PHRASE);

    let mut visible = raw.to_string();
    if !trigger.is_empty() {
        // removal can splice a new occurrence together
        while visible.contains(trigger) {
            visible = visible.replace(trigger, "");
        }
    }

    (visible.trim().to_string(), has_trigger || has_phrase)
}
