use serde::{Deserialize, Serialize};

use crate::llm_client::{GroundingChunk, WebSource};

/// A citation shown under a chat reply or news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub uri: String,
}

impl From<&WebSource> for SourceLink {
    fn from(web: &WebSource) -> Self {
        Self {
            // Untitled sources are labelled with their URI.
            title: web.title.clone().unwrap_or_else(|| web.uri.clone()),
            uri: web.uri.clone(),
        }
    }
}

/// Uniform result of a persona chat call. Optional fields being absent means
/// "not applicable", never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_thinking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_handoff: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_link: Option<String>,
}

impl AiResult {
    pub fn needs_handoff(&self) -> bool {
        self.needs_handoff.unwrap_or(false)
    }

    /// Web citations carried by this result, in provider order.
    pub fn source_links(&self) -> Vec<SourceLink> {
        self.grounding_chunks
            .iter()
            .flatten()
            .filter_map(|chunk| chunk.web.as_ref())
            .map(SourceLink::from)
            .collect()
    }
}
