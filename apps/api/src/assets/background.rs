use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::assets::AssetSynthesizer;
use crate::llm_client::prompts::BACKGROUND_PROMPTS;
use crate::store::{get_json, set_json, KeyValueStore, BG_ASSETS_KEY, BG_DISABLED_KEY};

/// Outcome of loading the decorative background panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "assets", rename_all = "lowercase")]
pub enum BackgroundArt {
    /// Generation was switched off for this session.
    Disabled,
    Cached(Vec<String>),
    Generated(Vec<String>),
    /// Every prompt failed; the page should use its static art.
    Fallback,
}

/// Loads background art once per session, caching successes in the ephemeral store.
#[derive(Clone)]
pub struct BackgroundLoader {
    synthesizer: AssetSynthesizer,
    store: Arc<dyn KeyValueStore>,
    /// Held from the flag check to the cache write so one batch runs at a time.
    generation: Arc<Mutex<()>>,
}

impl BackgroundLoader {
    pub fn new(synthesizer: AssetSynthesizer, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            synthesizer,
            store,
            generation: Arc::new(Mutex::new(())),
        }
    }

    pub async fn load(&self) -> BackgroundArt {
        let _guard = self.generation.lock().await;

        match self.store.has_flag(BG_DISABLED_KEY).await {
            Ok(true) => return BackgroundArt::Disabled,
            Ok(false) => {}
            Err(e) => warn!("Could not read background flag: {e}"),
        }

        match get_json::<Vec<String>>(self.store.as_ref(), BG_ASSETS_KEY).await {
            Ok(Some(uris)) if !uris.is_empty() => return BackgroundArt::Cached(uris),
            Ok(_) => {}
            Err(e) => warn!("Ignoring unreadable background cache: {e}"),
        }

        let uris: Vec<String> = self
            .synthesizer
            .generate_batch(&BACKGROUND_PROMPTS)
            .await
            .into_iter()
            .flatten()
            .collect();

        if uris.is_empty() {
            warn!("All background prompts failed; disabling generation for this session");
            if let Err(e) = self.store.set_flag(BG_DISABLED_KEY).await {
                warn!("Could not persist background flag: {e}");
            }
            return BackgroundArt::Fallback;
        }

        info!(
            "Generated {}/{} background assets",
            uris.len(),
            BACKGROUND_PROMPTS.len()
        );
        if let Err(e) = set_json(self.store.as_ref(), BG_ASSETS_KEY, &uris).await {
            warn!("Could not cache background assets: {e}");
        }
        BackgroundArt::Generated(uris)
    }
}
