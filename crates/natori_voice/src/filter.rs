//! Text cleanup before synthesis.
//!
//! Emoji, URLs and markdown asterisks read badly (or get spelled out), so
//! they are removed and whitespace is collapsed.

use regex::Regex;
use std::sync::LazyLock;

static RE_EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{1F900}-\x{1F9FF}\x{1F018}-\x{1F270}\x{238C}\x{2194}-\x{2199}\x{21A9}-\x{21AA}\x{2934}-\x{2935}\x{23CF}\x{23E9}-\x{23F3}\x{23F8}-\x{23FA}\x{25AA}-\x{25AB}\x{25B6}\x{25C0}\x{25FB}-\x{25FE}\x{2B50}\x{2B55}\x{3030}\x{303D}\x{3297}\x{3299}]").unwrap()
});
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+|www\.\S+|[a-z0-9][a-z0-9-]*[a-z0-9]*\.[a-z]{2,}(/\S*)?").unwrap()
});
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// The part of `text` worth reading aloud. May be empty.
pub fn speakable_text(text: &str) -> String {
    let text = RE_EMOJI.replace_all(text, "");
    let text = RE_URL.replace_all(&text, "");
    let text = text.replace('*', "");
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}
