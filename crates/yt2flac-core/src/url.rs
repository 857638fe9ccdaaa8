//! YouTube URL validation

use regex::Regex;
use std::sync::LazyLock;

static YOUTUBE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://(www\.)?(youtube\.com|youtu\.be)/",
        r"^https?://m\.youtube\.com/",
        r"^https?://music\.youtube\.com/",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Check whether a string looks like a supported YouTube URL.
///
/// Accepts the standard, shortened (youtu.be), mobile and music subdomain
/// variants. A scheme is required; no network access happens here.
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_PATTERNS.iter().any(|re| re.is_match(url))
}
