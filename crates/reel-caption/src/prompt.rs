//! Caption prompt templates.

use reel_models::{Language, Segment};

/// At most this many segments are listed in a prompt.
pub const MAX_PROMPT_SEGMENTS: usize = 4;

const DEFAULT_MOMENTS: &str = "0-34s";

/// Render up to [`MAX_PROMPT_SEGMENTS`] segments as `"{start}-{end}s"` joined by `" / "`.
///
/// Bounds are truncated to whole seconds.
pub fn format_moments(segments: &[Segment]) -> String {
    let moments = segments
        .iter()
        .take(MAX_PROMPT_SEGMENTS)
        .map(|s| format!("{}-{}s", s.start.trunc() as i64, s.end.trunc() as i64))
        .collect::<Vec<_>>()
        .join(" / ");

    if moments.is_empty() {
        DEFAULT_MOMENTS.to_string()
    } else {
        moments
    }
}

/// Build the caption prompt for a video's chosen segments.
pub fn build_prompt(_video_id: &str, segments: &[Segment], language: Language) -> String {
    let moments = format_moments(segments);
    match language {
        Language::Zh => format!(
            "你是短影音文案助理，請用旅遊短片語氣寫一句 25~40 字的 caption，\
             語調自然，避免浮誇，結尾附 2~3 個 hashtag。重點片段：{}",
            moments
        ),
        Language::En => format!(
            "You are a short-video caption assistant. Write a natural 15–25 word travel-style \
             caption with 2–3 hashtags at the end. Key moments: {}.",
            moments
        ),
    }
}
