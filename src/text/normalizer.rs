use once_cell::sync::Lazy;
use regex::Regex;
use super::{porter, stopwords::is_stopword};

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

const MIN_TOKEN_CHARS: usize = 3;

/// Turns scraped page text into the feature string the vectorizer was trained on.
///
/// Stage order matters: stopwords are matched against the raw whitespace tokens,
/// before lowercasing or punctuation removal, so `"The"` and `"the,"` survive.
pub fn normalize(raw: &str) -> String {
    let kept = strip_stopwords(raw);
    let cleaned = clean_characters(&kept);

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(porter::stem)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops whitespace-separated tokens that exactly match a stopword.
pub fn strip_stopwords(raw: &str) -> String {
    raw.split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercases, then removes symbols and digits, then trims.
pub fn clean_characters(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_symbols = NON_WORD.replace_all(&lowered, "");
    let without_digits = DIGITS.replace_all(&without_symbols, "");
    without_digits.trim().to_string()
}
