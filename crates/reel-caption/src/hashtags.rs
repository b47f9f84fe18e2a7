//! Hashtag extraction from generated captions.

use std::sync::OnceLock;

use regex::Regex;

/// Hashtags attached when the generated text has none.
pub const DEFAULT_HASHTAGS: [&str; 3] = ["#AutoHighlight", "#Travel", "#Shorts"];

fn hashtag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[\p{L}\p{N}_]+").expect("valid hashtag regex"))
}

/// Extract `#tag` tokens in order of first appearance, without duplicates.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for m in hashtag_regex().find_iter(text) {
        let tag = m.as_str();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

pub fn default_hashtags() -> Vec<String> {
    DEFAULT_HASHTAGS.iter().map(|s| s.to_string()).collect()
}
