//! Entry kinds.
//!
//! The set is open: names outside the standard list are kept as `Unknown`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Standard bibtex/biblatex entry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardEntryType {
    Article,
    Book,
    Booklet,
    Collection,
    Conference,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    Online,
    PhdThesis,
    Proceedings,
    Report,
    TechReport,
    Thesis,
    Unpublished,
}

const STANDARD_ENTRY_TYPES: &[StandardEntryType] = &[
    StandardEntryType::Article,
    StandardEntryType::Book,
    StandardEntryType::Booklet,
    StandardEntryType::Collection,
    StandardEntryType::Conference,
    StandardEntryType::InBook,
    StandardEntryType::InCollection,
    StandardEntryType::InProceedings,
    StandardEntryType::Manual,
    StandardEntryType::MastersThesis,
    StandardEntryType::Misc,
    StandardEntryType::Online,
    StandardEntryType::PhdThesis,
    StandardEntryType::Proceedings,
    StandardEntryType::Report,
    StandardEntryType::TechReport,
    StandardEntryType::Thesis,
    StandardEntryType::Unpublished,
];

impl StandardEntryType {
    /// Display form, as written in bibliography files.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Book => "Book",
            Self::Booklet => "Booklet",
            Self::Collection => "Collection",
            Self::Conference => "Conference",
            Self::InBook => "InBook",
            Self::InCollection => "InCollection",
            Self::InProceedings => "InProceedings",
            Self::Manual => "Manual",
            Self::MastersThesis => "MastersThesis",
            Self::Misc => "Misc",
            Self::Online => "Online",
            Self::PhdThesis => "PhdThesis",
            Self::Proceedings => "Proceedings",
            Self::Report => "Report",
            Self::TechReport => "TechReport",
            Self::Thesis => "Thesis",
            Self::Unpublished => "Unpublished",
        }
    }
}

/// Kind of one entry. Defaults to `Misc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    Standard(StandardEntryType),
    /// Custom kind, stored lowercased.
    Unknown(String),
}

impl EntryType {
    /// Parses a type name case-insensitively. Blank input yields the default.
    pub fn parse(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Self::default();
        }
        STANDARD_ENTRY_TYPES
            .iter()
            .copied()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(&normalized))
            .map(Self::Standard)
            .unwrap_or(Self::Unknown(normalized))
    }

    /// Lowercase name.
    pub fn name(&self) -> String {
        match self {
            Self::Standard(kind) => kind.display_name().to_ascii_lowercase(),
            Self::Unknown(name) => name.clone(),
        }
    }

    /// Human-readable name; custom kinds get their first letter capitalized.
    pub fn display_name(&self) -> String {
        match self {
            Self::Standard(kind) => kind.display_name().to_string(),
            Self::Unknown(name) => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl Default for EntryType {
    fn default() -> Self {
        Self::Standard(StandardEntryType::Misc)
    }
}

impl From<StandardEntryType> for EntryType {
    fn from(value: StandardEntryType) -> Self {
        Self::Standard(value)
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl Serialize for EntryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for EntryType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EntryType::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryType, StandardEntryType};

    #[test]
    fn parse_matches_standard_types_case_insensitively() {
        assert_eq!(
            EntryType::parse("ARTICLE"),
            EntryType::Standard(StandardEntryType::Article)
        );
        assert_eq!(
            EntryType::parse("inproceedings"),
            EntryType::Standard(StandardEntryType::InProceedings)
        );
    }

    #[test]
    fn blank_name_falls_back_to_misc() {
        assert_eq!(EntryType::parse("  "), EntryType::default());
        assert_eq!(EntryType::default().display_name(), "Misc");
    }

    #[test]
    fn unknown_types_keep_their_name() {
        let kind = EntryType::parse("Patent");
        assert_eq!(kind, EntryType::Unknown("patent".to_string()));
        assert_eq!(kind.name(), "patent");
        assert_eq!(kind.display_name(), "Patent");
    }
}
