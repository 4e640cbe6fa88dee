use once_cell::sync::Lazy;
use regex::Regex;

// recognizes the `watch?v=<id>` and `youtu.be/<id>` link forms. ids are
// exactly 11 characters of [A-Za-z0-9_-].
static VIDEO_ID: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?:v=|\.be/)([A-Za-z0-9_-]{11})").unwrap());

pub fn extract_video_id(input: &str) -> Option<&str> {
  VIDEO_ID
    .captures(input)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}
