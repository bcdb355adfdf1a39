//! Field identifiers.
//!
//! # Responsibility
//! - Name every slot an entry can hold, including reserved internal slots.
//! - Own the static bibtex <-> biblatex alias table.
//!
//! # Invariants
//! - Field names are compared case-insensitively; `Unknown` names are stored
//!   lowercased.
//! - A field name is never empty.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known bibliographic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardField {
    Abstract,
    Address,
    Annotation,
    Annote,
    ArchivePrefix,
    Author,
    BookTitle,
    Chapter,
    Comment,
    Crossref,
    Date,
    Day,
    Doi,
    Edition,
    Editor,
    EprintClass,
    EprintType,
    File,
    HowPublished,
    Institution,
    Isbn,
    Issn,
    Journal,
    JournalTitle,
    /// The bibliographic `key` field, not the citation key.
    Key,
    Keywords,
    Location,
    Month,
    Note,
    Number,
    Organization,
    Pages,
    Pdf,
    PrimaryClass,
    Publisher,
    Related,
    School,
    Series,
    SortKey,
    Timestamp,
    Title,
    Type,
    Url,
    Volume,
    Year,
}

const STANDARD_FIELDS: &[StandardField] = &[
    StandardField::Abstract,
    StandardField::Address,
    StandardField::Annotation,
    StandardField::Annote,
    StandardField::ArchivePrefix,
    StandardField::Author,
    StandardField::BookTitle,
    StandardField::Chapter,
    StandardField::Comment,
    StandardField::Crossref,
    StandardField::Date,
    StandardField::Day,
    StandardField::Doi,
    StandardField::Edition,
    StandardField::Editor,
    StandardField::EprintClass,
    StandardField::EprintType,
    StandardField::File,
    StandardField::HowPublished,
    StandardField::Institution,
    StandardField::Isbn,
    StandardField::Issn,
    StandardField::Journal,
    StandardField::JournalTitle,
    StandardField::Key,
    StandardField::Keywords,
    StandardField::Location,
    StandardField::Month,
    StandardField::Note,
    StandardField::Number,
    StandardField::Organization,
    StandardField::Pages,
    StandardField::Pdf,
    StandardField::PrimaryClass,
    StandardField::Publisher,
    StandardField::Related,
    StandardField::School,
    StandardField::Series,
    StandardField::SortKey,
    StandardField::Timestamp,
    StandardField::Title,
    StandardField::Type,
    StandardField::Url,
    StandardField::Volume,
    StandardField::Year,
];

impl StandardField {
    /// Stable lowercase name used in bibliography files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Address => "address",
            Self::Annotation => "annotation",
            Self::Annote => "annote",
            Self::ArchivePrefix => "archiveprefix",
            Self::Author => "author",
            Self::BookTitle => "booktitle",
            Self::Chapter => "chapter",
            Self::Comment => "comment",
            Self::Crossref => "crossref",
            Self::Date => "date",
            Self::Day => "day",
            Self::Doi => "doi",
            Self::Edition => "edition",
            Self::Editor => "editor",
            Self::EprintClass => "eprintclass",
            Self::EprintType => "eprinttype",
            Self::File => "file",
            Self::HowPublished => "howpublished",
            Self::Institution => "institution",
            Self::Isbn => "isbn",
            Self::Issn => "issn",
            Self::Journal => "journal",
            Self::JournalTitle => "journaltitle",
            Self::Key => "key",
            Self::Keywords => "keywords",
            Self::Location => "location",
            Self::Month => "month",
            Self::Note => "note",
            Self::Number => "number",
            Self::Organization => "organization",
            Self::Pages => "pages",
            Self::Pdf => "pdf",
            Self::PrimaryClass => "primaryclass",
            Self::Publisher => "publisher",
            Self::Related => "related",
            Self::School => "school",
            Self::Series => "series",
            Self::SortKey => "sortkey",
            Self::Timestamp => "timestamp",
            Self::Title => "title",
            Self::Type => "type",
            Self::Url => "url",
            Self::Volume => "volume",
            Self::Year => "year",
        }
    }

    /// Looks up a standard field by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        STANDARD_FIELDS
            .iter()
            .copied()
            .find(|field| field.name() == name)
    }

    /// Returns the other half of a bibtex <-> biblatex alias pair.
    ///
    /// The table is symmetric: `alias(alias(f)) == Some(f)` for every aliased
    /// field.
    pub fn alias(self) -> Option<Self> {
        match self {
            Self::Address => Some(Self::Location),
            Self::Location => Some(Self::Address),
            Self::Annote => Some(Self::Annotation),
            Self::Annotation => Some(Self::Annote),
            Self::ArchivePrefix => Some(Self::EprintType),
            Self::EprintType => Some(Self::ArchivePrefix),
            Self::Journal => Some(Self::JournalTitle),
            Self::JournalTitle => Some(Self::Journal),
            Self::Key => Some(Self::SortKey),
            Self::SortKey => Some(Self::Key),
            Self::Pdf => Some(Self::File),
            Self::File => Some(Self::Pdf),
            Self::PrimaryClass => Some(Self::EprintClass),
            Self::EprintClass => Some(Self::PrimaryClass),
            Self::School => Some(Self::Institution),
            Self::Institution => Some(Self::School),
            _ => None,
        }
    }
}

/// Reserved slots that never appear as ordinary bibliographic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InternalField {
    /// Citation key storage slot.
    KeyField,
    /// Pseudo-field resolving to the entry type display name.
    TypeHeader,
    /// Legacy spelling of `TypeHeader`, still accepted by resolvers.
    ObsoleteTypeHeader,
    /// Pseudo-field used to report identifier renames.
    InternalId,
}

impl InternalField {
    pub fn name(self) -> &'static str {
        match self {
            Self::KeyField => "bibtexkey",
            Self::TypeHeader => "entrytype",
            Self::ObsoleteTypeHeader => "bibtextype",
            Self::InternalId => "__internal_id",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bibtexkey" => Some(Self::KeyField),
            "entrytype" => Some(Self::TypeHeader),
            "bibtextype" => Some(Self::ObsoleteTypeHeader),
            "__internal_id" => Some(Self::InternalId),
            _ => None,
        }
    }
}

/// Identifier of one entry slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Standard(StandardField),
    Internal(InternalField),
    /// User-defined field. Only `Field::parse` builds one.
    Unknown(UnknownFieldName),
}

/// Lowercased, non-empty name of a user-defined field that is neither a
/// standard nor an internal name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownFieldName(String);

impl UnknownFieldName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UnknownFieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Field {
    /// Parses a field name case-insensitively.
    ///
    /// # Errors
    /// - Returns `FieldNameError::Empty` for blank names.
    pub fn parse(name: &str) -> Result<Self, FieldNameError> {
        let normalized = name.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(FieldNameError::Empty);
        }
        if let Some(field) = InternalField::from_name(&normalized) {
            return Ok(Self::Internal(field));
        }
        if let Some(field) = StandardField::from_name(&normalized) {
            return Ok(Self::Standard(field));
        }
        Ok(Self::Unknown(UnknownFieldName(normalized)))
    }

    /// Lowercase name of this field.
    pub fn name(&self) -> &str {
        match self {
            Self::Standard(field) => field.name(),
            Self::Internal(field) => field.name(),
            Self::Unknown(name) => name.as_str(),
        }
    }

    /// Returns the configured alias, if any. Only one hop is ever taken.
    pub fn alias(&self) -> Option<Field> {
        match self {
            Self::Standard(field) => field.alias().map(Field::Standard),
            _ => None,
        }
    }

    /// Whether this is the type-header pseudo-field (current or legacy name).
    pub fn is_type_header(&self) -> bool {
        matches!(
            self,
            Self::Internal(InternalField::TypeHeader | InternalField::ObsoleteTypeHeader)
        )
    }
}

impl From<StandardField> for Field {
    fn from(value: StandardField) -> Self {
        Self::Standard(value)
    }
}

impl From<InternalField> for Field {
    fn from(value: InternalField) -> Self {
        Self::Internal(value)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Field::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Field name parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNameError {
    Empty,
}

impl Display for FieldNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "field name must not be empty"),
        }
    }
}

impl Error for FieldNameError {}

/// Ordered alternatives, resolved as a logical OR (`author/editor`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrFields(Vec<Field>);

impl OrFields {
    pub fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    /// Parses `a/b/c` into alternatives, skipping blank segments.
    pub fn parse(value: &str) -> Result<Self, FieldNameError> {
        let fields = value
            .split('/')
            .filter(|segment| !segment.trim().is_empty())
            .map(Field::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if fields.is_empty() {
            return Err(FieldNameError::Empty);
        }
        Ok(Self(fields))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Field> for OrFields {
    fn from(value: Field) -> Self {
        Self(vec![value])
    }
}

impl From<StandardField> for OrFields {
    fn from(value: StandardField) -> Self {
        Self(vec![Field::Standard(value)])
    }
}

impl Display for OrFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self.0.iter().map(Field::name).collect::<Vec<_>>();
        f.write_str(&names.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldNameError, InternalField, OrFields, StandardField, STANDARD_FIELDS};

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            Field::parse(" Title ").expect("title should parse"),
            Field::Standard(StandardField::Title)
        );
        assert_eq!(
            Field::parse("BibTexKey").expect("key field should parse"),
            Field::Internal(InternalField::KeyField)
        );
        let custom = Field::parse("MyCustom").expect("custom should parse");
        assert!(matches!(custom, Field::Unknown(_)));
        assert_eq!(custom.name(), "mycustom");
    }

    #[test]
    fn reserved_names_never_become_unknown() {
        for name in ["title", "TITLE", "bibtexkey", "Location"] {
            let field = Field::parse(name).expect("reserved name should parse");
            assert!(!matches!(field, Field::Unknown(_)), "{name} parsed as unknown");
        }
    }

    #[test]
    fn parse_rejects_blank_names() {
        assert_eq!(Field::parse("   "), Err(FieldNameError::Empty));
    }

    #[test]
    fn alias_table_is_symmetric() {
        for field in STANDARD_FIELDS {
            if let Some(alias) = field.alias() {
                assert_eq!(alias.alias(), Some(*field), "alias of {}", field.name());
            }
        }
        assert_eq!(
            StandardField::Address.alias(),
            Some(StandardField::Location)
        );
        assert_eq!(StandardField::Title.alias(), None);
    }

    #[test]
    fn every_standard_name_round_trips() {
        for field in STANDARD_FIELDS {
            assert_eq!(StandardField::from_name(field.name()), Some(*field));
        }
    }

    #[test]
    fn internal_fields_have_no_alias() {
        assert_eq!(Field::Internal(InternalField::KeyField).alias(), None);
        assert!(Field::Internal(InternalField::ObsoleteTypeHeader).is_type_header());
    }

    #[test]
    fn or_fields_parse_and_display() {
        let fields = OrFields::parse("author/editor").expect("or fields should parse");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.to_string(), "author/editor");
        assert!(OrFields::parse("//").is_err());
    }
}
