use std::sync::Arc;

use crate::assets::{AssetSynthesizer, BackgroundLoader};
use crate::config::Config;
use crate::llm_client::GenerativeModel;
use crate::news::NewsDigest;
use crate::persona::{ChatSessions, PersonaClient};
use crate::store::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub persona: PersonaClient,
    pub news: NewsDigest,
    pub assets: AssetSynthesizer,
    pub background: BackgroundLoader,
    /// Chat logs, one per visitor session. Memory only.
    pub sessions: ChatSessions,
}

impl AppState {
    /// `durable` backs the news cache; `ephemeral` backs background art.
    pub fn new(
        config: Config,
        model: Arc<dyn GenerativeModel>,
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
    ) -> Self {
        let assets = AssetSynthesizer::new(model.clone());
        Self {
            config,
            persona: PersonaClient::new(model.clone()),
            news: NewsDigest::new(model, durable),
            background: BackgroundLoader::new(assets.clone(), ephemeral),
            assets,
            sessions: ChatSessions::new(),
        }
    }
}
