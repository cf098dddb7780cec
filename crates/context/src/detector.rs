//! Lexical detection of contextual references.
//!
//! A query like "explain it in more detail" only makes sense relative to an
//! earlier turn. We catch these with two word-boundary regex families: one for
//! pronouns and deictic noun phrases, one for verbs of reference. Detection is
//! purely lexical, so it never needs a model call and never fails.

use std::sync::LazyLock;

use regex::Regex;

static PRONOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(this|it|that|these|those|their|they|the topic|the concept|the process|he|she|we|us|our|its)\b",
    )
    .unwrap()
});

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(refer|previous|earlier|before|last|mentioned|above|said)\b").unwrap()
});

/// Returns true when `text` appears to lean on earlier conversation turns.
///
/// Empty or whitespace-only input is never contextual.
pub fn has_contextual_reference(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    PRONOUN_RE.is_match(text) || REFERENCE_RE.is_match(text)
}
