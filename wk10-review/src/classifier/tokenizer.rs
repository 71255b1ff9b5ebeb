//! Review text preprocessing
//!
//! HTML tags are stripped, emoticons kept as tokens, everything else
//! lower-cased and split on non-word characters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("HTML_TAG must compile"));

static EMOTICON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?::|;|=)(?:-)?(?:\)|\(|D|P)").expect("EMOTICON must compile")
});

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("NON_WORD must compile"));

/// Split `text` into model tokens, dropping `stop_words`
///
/// Emoticons (`:-)` → `:)`) are appended after the word tokens.
pub fn tokenize(text: &str, stop_words: &HashSet<String>) -> Vec<String> {
    let text = HTML_TAG.replace_all(text, " ");

    let emoticons = EMOTICON
        .find_iter(&text)
        .map(|m| m.as_str().replace('-', ""));

    let lowered = text.to_lowercase();
    let words = NON_WORD.replace_all(&lowered, " ");

    words
        .split_whitespace()
        .map(str::to_string)
        .chain(emoticons)
        .filter(|token| !stop_words.contains(token))
        .collect()
}
