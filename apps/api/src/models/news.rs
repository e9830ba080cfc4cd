use serde::{Deserialize, Serialize};

use crate::models::ai::SourceLink;

/// One item as the model writes it inside the JSON array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNewsItem {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: String,
}

/// A news article ready for display. `id` is `news-<fetchTimestampMs>-<index>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceLink>>,
}

/// Persisted under `TECH_NEWS_CACHE`. `timestamp` is epoch milliseconds of the fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsCacheEntry {
    pub articles: Vec<NewsArticle>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub articles: Vec<NewsArticle>,
    /// Epoch milliseconds of the fetch that produced `articles`.
    pub last_updated: i64,
}

impl From<NewsCacheEntry> for NewsResponse {
    fn from(entry: NewsCacheEntry) -> Self {
        Self {
            articles: entry.articles,
            last_updated: entry.timestamp,
        }
    }
}
