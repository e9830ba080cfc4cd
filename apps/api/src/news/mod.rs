//! News digest — search-grounded tech news with a one-hour durable cache.
//!
//! Cache-first: a fresh entry is served without a network call. A failed live
//! fetch falls back to whatever entry exists, regardless of age, and only
//! propagates when there is nothing cached at all.

pub mod extract;
pub mod handlers;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::llm_client::prompts::news_prompt;
use crate::llm_client::{AiError, GenerateRequest, GenerativeModel};
use crate::models::news::{NewsArticle, NewsCacheEntry, NewsResponse, RawNewsItem};
use crate::news::extract::{build_articles, extract_json_array};
use crate::store::{get_json, set_json, KeyValueStore, NEWS_CACHE_KEY};

pub const NEWS_BATCH_SIZE: usize = 6;
pub const NEWS_TTL_MS: i64 = 3_600_000;
const NEWS_TEMPERATURE: f32 = 0.2;

#[derive(Clone)]
pub struct NewsDigest {
    model: Arc<dyn GenerativeModel>,
    store: Arc<dyn KeyValueStore>,
    /// Serialises cache check, fetch and write so concurrent callers share one refresh.
    refresh: Arc<Mutex<()>>,
}

impl NewsDigest {
    pub fn new(model: Arc<dyn GenerativeModel>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            model,
            store,
            refresh: Arc::new(Mutex::new(())),
        }
    }

    pub async fn get_latest_news(&self, force_refresh: bool) -> Result<NewsResponse, AiError> {
        self.get_latest_news_at(force_refresh, Utc::now().timestamp_millis())
            .await
    }

    /// Same as `get_latest_news` with an explicit clock, in epoch milliseconds.
    pub async fn get_latest_news_at(
        &self,
        force_refresh: bool,
        now_ms: i64,
    ) -> Result<NewsResponse, AiError> {
        let _guard = self.refresh.lock().await;
        let cached = self.read_cache().await;

        if !force_refresh {
            if let Some(entry) = cached.as_ref().filter(|e| is_fresh(e, now_ms)) {
                return Ok(entry.clone().into());
            }
        }

        match self.fetch(now_ms).await {
            Ok(articles) => {
                let entry = NewsCacheEntry {
                    articles,
                    timestamp: now_ms,
                };
                if let Err(e) = set_json(self.store.as_ref(), NEWS_CACHE_KEY, &entry).await {
                    warn!("Failed to persist news cache: {e}");
                }
                info!("News digest refreshed with {} articles", entry.articles.len());
                Ok(entry.into())
            }
            Err(e) => match cached {
                Some(entry) => {
                    warn!(
                        "News fetch failed ({e}); serving cache from {}ms ago",
                        now_ms - entry.timestamp
                    );
                    Ok(entry.into())
                }
                None => Err(e),
            },
        }
    }

    async fn read_cache(&self) -> Option<NewsCacheEntry> {
        match get_json::<NewsCacheEntry>(self.store.as_ref(), NEWS_CACHE_KEY).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring unreadable news cache: {e}");
                None
            }
        }
    }

    async fn fetch(&self, fetched_at: i64) -> Result<Vec<NewsArticle>, AiError> {
        let request = GenerateRequest::text(news_prompt(NEWS_BATCH_SIZE))
            .with_temperature(NEWS_TEMPERATURE)
            .with_search();
        let response = self.model.generate(request).await?;

        let items: Vec<RawNewsItem> = extract_json_array(&response.text())?;
        if items.is_empty() {
            return Err(AiError::EmptyResult);
        }

        Ok(build_articles(items, &response.web_sources(), fetched_at))
    }
}

fn is_fresh(entry: &NewsCacheEntry, now_ms: i64) -> bool {
    now_ms - entry.timestamp < NEWS_TTL_MS
}
