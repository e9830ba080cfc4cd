//! Pulls the JSON array out of a free-text model reply and pairs articles with sources.

use serde::de::DeserializeOwned;

use crate::llm_client::{strip_json_fences, AiError};
use crate::models::ai::SourceLink;
use crate::models::news::{NewsArticle, RawNewsItem};

/// How many consecutive sources each article is offered.
const SOURCE_WINDOW: usize = 2;

/// Parses the substring between the first `[` and the last `]`, then the whole
/// text as a fallback. Fails with `MalformedResponse` when neither parses.
pub fn extract_json_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, AiError> {
    if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) {
        if start < end {
            if let Ok(items) = serde_json::from_str(&raw[start..=end]) {
                return Ok(items);
            }
        }
    }

    serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| AiError::MalformedResponse(format!("no parseable JSON array: {e}")))
}

/// Sources offered to the article at `index`: the slice `[index, index + 2)`,
/// clamped to the list. Neighbouring articles overlap by one source.
pub fn source_window(sources: &[SourceLink], index: usize) -> &[SourceLink] {
    let start = index.min(sources.len());
    let end = (index + SOURCE_WINDOW).min(sources.len());
    &sources[start..end]
}

/// Assigns `news-<fetched_at>-<index>` ids in array order and attaches sources.
pub fn build_articles(
    items: Vec<RawNewsItem>,
    sources: &[SourceLink],
    fetched_at: i64,
) -> Vec<NewsArticle> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let window = source_window(sources, index);
            NewsArticle {
                id: format!("news-{fetched_at}-{index}"),
                title: item.title,
                summary: item.summary,
                url: item.url,
                published_at: item.published_at,
                sources: (!window.is_empty()).then(|| window.to_vec()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(n: usize) -> SourceLink {
        SourceLink {
            title: format!("Source {n}"),
            uri: format!("https://example.com/{n}"),
        }
    }

    fn item(title: &str) -> RawNewsItem {
        RawNewsItem {
            title: title.to_string(),
            summary: String::new(),
            url: String::new(),
            published_at: String::new(),
        }
    }

    #[test]
    fn test_extract_ignores_surrounding_noise() {
        let raw = r#"prefix-noise [ {"title": "A"} , {"title": "B"} ] suffix-noise"#;
        let items: Vec<RawNewsItem> = extract_json_array(raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[1].title, "B");
    }

    #[test]
    fn test_extract_trailing_citation_brackets_are_malformed() {
        // the last ']' belongs to the citation list, not the array
        let raw = r#"Stories: [ {"title": "A"} ] Sources: [1] [2]"#;
        let result = extract_json_array::<RawNewsItem>(raw);
        assert!(matches!(result, Err(AiError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_handles_fenced_array() {
        let raw = "```json\n[{\"title\": \"A\", \"publishedAt\": \"2026-10-14\"}]\n```";
        let items: Vec<RawNewsItem> = extract_json_array(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].published_at, "2026-10-14");
    }

    #[test]
    fn test_extract_without_array_is_malformed() {
        let result = extract_json_array::<RawNewsItem>("Sorry, I couldn't find any news.");
        assert!(matches!(result, Err(AiError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_reversed_brackets_is_malformed() {
        let result = extract_json_array::<RawNewsItem>("] nothing here [");
        assert!(matches!(result, Err(AiError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_empty_array_is_ok() {
        let items: Vec<RawNewsItem> = extract_json_array("[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_source_window_for_five_articles_three_sources() {
        let sources: Vec<SourceLink> = (0..3).map(link).collect();
        assert_eq!(source_window(&sources, 0), &sources[0..2]);
        assert_eq!(source_window(&sources, 1), &sources[1..3]);
        assert_eq!(source_window(&sources, 2), &sources[2..3]);
        assert!(source_window(&sources, 3).is_empty());
        assert!(source_window(&sources, 4).is_empty());
    }

    #[test]
    fn test_source_window_with_no_sources() {
        assert!(source_window(&[], 0).is_empty());
    }

    #[test]
    fn test_build_articles_assigns_ids_and_sources() {
        let sources: Vec<SourceLink> = (0..3).map(link).collect();
        let items = ["a", "b", "c", "d", "e"].map(item).to_vec();
        let articles = build_articles(items, &sources, 1_700_000_000_000);

        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].id, "news-1700000000000-0");
        assert_eq!(articles[4].id, "news-1700000000000-4");
        assert_eq!(articles[0].sources.as_deref(), Some(&sources[0..2]));
        assert_eq!(articles[1].sources.as_deref(), Some(&sources[1..3]));
        assert_eq!(articles[2].sources.as_deref(), Some(&sources[2..3]));
        assert!(articles[3].sources.is_none());
        assert!(articles[4].sources.is_none());
    }
}
