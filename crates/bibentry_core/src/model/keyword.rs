//! Keyword value types.
//!
//! # Invariants
//! - Keywords compare case-insensitively; the first spelling added wins.
//! - A `KeywordList` never holds two equal keywords or an empty keyword.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// One keyword token.
#[derive(Debug, Clone)]
pub struct Keyword(String);

impl Keyword {
    /// Creates a keyword from trimmed text. Returns `None` for blank input.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl Eq for Keyword {}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_lowercase().hash(state);
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, duplicate-free keyword sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList {
    keywords: Vec<Keyword>,
}

impl KeywordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a delimiter-joined field value. Blank tokens are skipped.
    pub fn parse(value: &str, delimiter: char) -> Self {
        let mut list = Self::new();
        for token in value.split(delimiter) {
            if let Some(keyword) = Keyword::new(token) {
                list.add(keyword);
            }
        }
        list
    }

    /// Serializes as `a, b, c` for delimiter `,`.
    pub fn as_string(&self, delimiter: char) -> String {
        let separator = format!("{delimiter} ");
        self.keywords
            .iter()
            .map(Keyword::as_str)
            .collect::<Vec<_>>()
            .join(&separator)
    }

    /// Appends `keyword` unless an equal keyword is already present.
    ///
    /// Returns whether the list changed.
    pub fn add(&mut self, keyword: Keyword) -> bool {
        if self.contains(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    pub fn contains(&self, keyword: &Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    /// Removes every keyword that appears in `other`.
    pub fn remove_all(&mut self, other: &KeywordList) {
        self.keywords.retain(|keyword| !other.contains(keyword));
    }

    /// Replaces each keyword found in `targets` by `replacement`.
    ///
    /// The replacement takes the position of the first match; later matches
    /// are dropped so the list stays duplicate-free.
    pub fn replace_all(&mut self, targets: &KeywordList, replacement: Keyword) {
        let mut replaced = Vec::with_capacity(self.keywords.len());
        for keyword in self.keywords.drain(..) {
            let next = if targets.contains(&keyword) {
                replacement.clone()
            } else {
                keyword
            };
            if !replaced.contains(&next) {
                replaced.push(next);
            }
        }
        self.keywords = replaced;
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }
}

impl FromIterator<Keyword> for KeywordList {
    fn from_iter<T: IntoIterator<Item = Keyword>>(iter: T) -> Self {
        let mut list = Self::new();
        for keyword in iter {
            list.add(keyword);
        }
        list
    }
}

impl<S: AsRef<str>> From<&[S]> for KeywordList {
    fn from(values: &[S]) -> Self {
        values.iter().filter_map(Keyword::new).collect()
    }
}
