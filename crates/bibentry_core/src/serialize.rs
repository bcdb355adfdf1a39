//! Canonical text form and serde snapshot of an entry.
//!
//! # Responsibility
//! - Render the canonical bibtex-like representation used by `Display`.
//! - Convert entries to and from a flat `EntryRecord` wire snapshot.
//!
//! # Invariants
//! - Canonical output is independent of field insertion order.
//! - Decoding a record never yields an entry with an empty id or an empty
//!   field value.

use crate::model::entry::{Entry, EntryError};
use crate::model::entry_type::EntryType;
use crate::model::field::{Field, FieldNameError, InternalField};
use crate::model::shared::SharedEntryData;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Renders `@type{key,` followed by sorted `name = {value}` lines.
///
/// Every stored field except the citation key is written; `\r\n` inside
/// values is normalized to `\n`.
pub fn canonical_representation(entry: &Entry) -> String {
    let mut out = format!(
        "@{}{{{},\n",
        entry.entry_type().name(),
        entry.cite_key().unwrap_or_default()
    );

    let sorted: BTreeMap<&str, &str> = entry
        .field_map()
        .iter()
        .filter(|(field, _)| **field != Field::Internal(InternalField::KeyField))
        .map(|(field, value)| (field.name(), value.as_str()))
        .collect();
    let lines = sorted
        .into_iter()
        .map(|(name, value)| format!("  {name} = {{{}}}", value.replace("\r\n", "\n")))
        .collect::<Vec<_>>();

    out.push_str(&lines.join(",\n"));
    out.push('\n');
    out.push('}');
    out
}

/// Flat wire snapshot of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    /// Serialized as `type` to match bibliography naming.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Field name -> raw value, sorted by name.
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub shared: SharedEntryData,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id().to_string(),
            entry_type: entry.entry_type().clone(),
            fields: entry
                .field_map()
                .iter()
                .map(|(field, value)| (field.name().to_string(), value.clone()))
                .collect(),
            comments: entry.user_comments().to_string(),
            shared: *entry.shared_data(),
        }
    }
}

/// Errors raised when rebuilding an entry from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRecordError {
    Entry(EntryError),
    FieldName(FieldNameError),
}

impl Display for EntryRecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry(err) => write!(f, "{err}"),
            Self::FieldName(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryRecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Entry(err) => Some(err),
            Self::FieldName(err) => Some(err),
        }
    }
}

impl From<EntryError> for EntryRecordError {
    fn from(value: EntryError) -> Self {
        Self::Entry(value)
    }
}

impl From<FieldNameError> for EntryRecordError {
    fn from(value: FieldNameError) -> Self {
        Self::FieldName(value)
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = EntryRecordError;

    /// Rebuilds an entry. The result is clean: no observers are attached
    /// yet, so the field writes publish nothing.
    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let mut entry = Entry::with_id(record.id, record.entry_type)?;
        for (name, value) in record.fields {
            entry.set_field(Field::parse(&name)?, value);
        }
        entry.set_comments_before_entry(&record.comments);
        *entry.shared_data_mut() = record.shared;
        entry.set_changed(false);
        Ok(entry)
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EntryRecord::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = EntryRecord::deserialize(deserializer)?;
        Entry::try_from(record).map_err(serde::de::Error::custom)
    }
}
