use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Dispatch mode for a persona request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Search tool enabled, low temperature.
    Grounded,
    /// No retrieval, higher temperature and a thinking budget.
    Reasoning,
}

const SEARCH_KEYWORDS: &str = r"(?i)latest|current|news|today|recent|documentation|vs|compare";

fn search_keywords() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SEARCH_KEYWORDS).expect("search keyword pattern is valid"))
}

/// Picks the dispatch mode from the visitor's input. Keywords match anywhere in
/// the text, ignoring case. There is no fallback between modes.
pub fn classify(input: &str) -> Mode {
    if search_keywords().is_match(input) {
        Mode::Grounded
    } else {
        Mode::Reasoning
    }
}
