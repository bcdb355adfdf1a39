//! Word tokenization for field values.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WORD_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;]+").expect("valid word separator regex"));

/// Splits text on whitespace, commas and semicolons, keeping original case.
pub fn string_as_words(text: &str) -> HashSet<String> {
    WORD_SEPARATOR_RE
        .split(text)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
