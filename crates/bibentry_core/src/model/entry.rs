//! Bibliographic entry aggregate.
//!
//! # Responsibility
//! - Own the field store of one entry and every mutation path into it.
//! - Resolve field values through aliases, date composition and crossrefs.
//! - Keep the derived-value cache and observers in step with mutations.
//!
//! # Invariants
//! - Stored field values are never empty; setting `""` clears the field.
//! - The identifier is never empty.
//! - A mutation purges cached values for its field before publishing.
//! - Equality covers type, fields and comments only.

use crate::config::TimestampPreferences;
use crate::database::EntryDatabase;
use crate::model::cache::DerivedValueCache;
use crate::model::date::Date;
use crate::model::doi::Doi;
use crate::model::entry_type::EntryType;
use crate::model::event::{
    EntryEvent, EntryEventKind, EntryObserver, EventSource, FieldChange, ObserverRegistry,
    ObserverToken,
};
use crate::model::field::{Field, InternalField, OrFields, StandardField};
use crate::model::keyword::{Keyword, KeywordList};
use crate::model::linked_file::{parse_file_field, write_file_field, LinkedFile};
use crate::model::month::Month;
use crate::model::shared::SharedEntryData;
use crate::serialize::canonical_representation;
use crate::text::latex::{LatexToUnicode, MarkupConverter};
use crate::text::words::string_as_words;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

static TRAILING_WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+$").expect("valid trailing whitespace regex"));

const KEY_FIELD: Field = Field::Internal(InternalField::KeyField);
const NOT_AVAILABLE: &str = "N/A";

/// Generates a fresh, process-unique entry identifier.
pub fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// Entry precondition errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    EmptyId,
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id must not be empty"),
        }
    }
}

impl Error for EntryError {}

/// One bibliographic record.
pub struct Entry {
    id: String,
    entry_type: EntryType,
    fields: HashMap<Field, String>,
    comments_before_entry: String,
    parsed_serialization: String,
    changed: bool,
    shared: SharedEntryData,
    cache: DerivedValueCache,
    converter: Arc<dyn MarkupConverter>,
    observers: ObserverRegistry,
}

impl Entry {
    /// Creates an empty `Misc` entry with a generated identifier.
    pub fn new() -> Self {
        Self::with_type(EntryType::default())
    }

    /// Creates an empty entry of the given type with a generated identifier.
    pub fn with_type(entry_type: impl Into<EntryType>) -> Self {
        Self {
            id: generate_entry_id(),
            entry_type: entry_type.into(),
            fields: HashMap::new(),
            comments_before_entry: String::new(),
            parsed_serialization: String::new(),
            changed: false,
            shared: SharedEntryData::default(),
            cache: DerivedValueCache::new(),
            converter: Arc::new(LatexToUnicode),
            observers: ObserverRegistry::new(),
        }
    }

    /// Creates an empty entry with a caller-provided identifier.
    ///
    /// Used by import and sync paths where identity already exists.
    ///
    /// # Errors
    /// - Returns `EntryError::EmptyId` for a blank identifier.
    pub fn with_id(id: impl Into<String>, entry_type: impl Into<EntryType>) -> Result<Self, EntryError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EntryError::EmptyId);
        }
        let mut entry = Self::with_type(entry_type);
        entry.id = id;
        Ok(entry)
    }

    /// Replaces the markup converter and drops every cached value.
    pub fn with_markup_converter(mut self, converter: Arc<dyn MarkupConverter>) -> Self {
        self.converter = converter;
        self.cache = DerivedValueCache::new();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Renames the entry and reports the rename on the internal-id pseudo-field.
    ///
    /// # Errors
    /// - Returns `EntryError::EmptyId` for a blank identifier.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<FieldChange, EntryError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EntryError::EmptyId);
        }

        let old_id = std::mem::replace(&mut self.id, id.clone());
        self.changed = true;
        let change = FieldChange::new(
            id.clone(),
            Field::Internal(InternalField::InternalId),
            Some(old_id),
            Some(id),
        );
        self.publish(EntryEventKind::FieldChanged, &change, EventSource::Local);
        Ok(change)
    }

    pub fn entry_type(&self) -> &EntryType {
        &self.entry_type
    }

    pub fn set_type(&mut self, entry_type: impl Into<EntryType>) -> Option<FieldChange> {
        self.set_type_with_source(entry_type, EventSource::Local)
    }

    /// Changes the entry type. Returns `None` when the type is unchanged.
    pub fn set_type_with_source(
        &mut self,
        entry_type: impl Into<EntryType>,
        source: EventSource,
    ) -> Option<FieldChange> {
        let entry_type = entry_type.into();
        if entry_type == self.entry_type {
            return None;
        }

        let old_type = std::mem::replace(&mut self.entry_type, entry_type);
        self.changed = true;
        let type_header = Field::Internal(InternalField::TypeHeader);
        self.cache.invalidate(&type_header);
        self.cache
            .invalidate(&Field::Internal(InternalField::ObsoleteTypeHeader));

        let change = FieldChange::new(
            self.id.clone(),
            type_header,
            Some(old_type.name()),
            Some(self.entry_type.name()),
        );
        self.publish(EntryEventKind::TypeChanged, &change, source);
        Some(change)
    }

    /// Names of all fields currently set.
    pub fn fields(&self) -> BTreeSet<Field> {
        self.fields.keys().cloned().collect()
    }

    pub fn field(&self, field: &Field) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn has_field(&self, field: &Field) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_map(&self) -> &HashMap<Field, String> {
        &self.fields
    }

    pub fn field_values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }

    pub fn set_field(&mut self, field: impl Into<Field>, value: impl Into<String>) -> Option<FieldChange> {
        self.set_field_with_source(field, value, EventSource::Local)
    }

    /// Sets one field and notifies observers.
    ///
    /// An empty value clears the field. Setting the current value is a
    /// no-op that returns `None` and publishes nothing.
    pub fn set_field_with_source(
        &mut self,
        field: impl Into<Field>,
        value: impl Into<String>,
        source: EventSource,
    ) -> Option<FieldChange> {
        let field = field.into();
        let value = value.into();
        if value.is_empty() {
            return self.clear_field_with_source(field, source);
        }

        let old_value = self.fields.get(&field).cloned();
        if old_value.as_deref() == Some(value.as_str()) {
            return None;
        }

        self.changed = true;
        self.fields.insert(field.clone(), value.clone());
        self.cache.invalidate(&field);

        let kind = if old_value.is_none() {
            EntryEventKind::FieldAdded
        } else {
            EntryEventKind::FieldChanged
        };
        let change = FieldChange::new(self.id.clone(), field, old_value, Some(value));
        self.publish(kind, &change, source);
        Some(change)
    }

    /// Sets the field only when a value is given.
    pub fn set_field_if_present(
        &mut self,
        field: impl Into<Field>,
        value: Option<String>,
        source: EventSource,
    ) -> Option<FieldChange> {
        value.and_then(|value| self.set_field_with_source(field, value, source))
    }

    /// Applies each pair independently and returns the changes made.
    pub fn set_fields<I, F, V>(&mut self, fields: I) -> Vec<FieldChange>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<Field>,
        V: Into<String>,
    {
        fields
            .into_iter()
            .filter_map(|(field, value)| self.set_field(field, value))
            .collect()
    }

    /// Builder form of `set_field`.
    pub fn with_field(mut self, field: impl Into<Field>, value: impl Into<String>) -> Self {
        self.set_field(field, value);
        self
    }

    pub fn clear_field(&mut self, field: impl Into<Field>) -> Option<FieldChange> {
        self.clear_field_with_source(field, EventSource::Local)
    }

    /// Removes one field and notifies observers. No-op when absent.
    pub fn clear_field_with_source(
        &mut self,
        field: impl Into<Field>,
        source: EventSource,
    ) -> Option<FieldChange> {
        let field = field.into();
        let old_value = self.fields.remove(&field)?;

        self.changed = true;
        self.cache.invalidate(&field);

        let change = FieldChange::new(self.id.clone(), field, Some(old_value), None);
        self.publish(EntryEventKind::FieldRemoved, &change, source);
        Some(change)
    }

    /// Raw value of `field`, falling back to its alias and to date
    /// composition/decomposition.
    pub fn field_or_alias(&self, field: &Field) -> Option<String> {
        self.resolve_with(field, |candidate| self.field(candidate).map(str::to_string))
    }

    /// Markup-normalized variant of `field_or_alias`.
    pub fn field_or_alias_latex_free(&self, field: &Field) -> Option<String> {
        self.resolve_with(field, |candidate| self.latex_free_field(candidate))
    }

    /// Resolves `field` the way formatters and exporters see it.
    ///
    /// The type-header and citation-key pseudo-fields are answered locally.
    /// Other fields fall back to the entry referenced through `database`
    /// when unset here, and the result goes through string expansion.
    pub fn resolved_field_or_alias(
        &self,
        field: &Field,
        database: Option<&dyn EntryDatabase>,
    ) -> Option<String> {
        if field.is_type_header() {
            return Some(self.entry_type.display_name());
        }
        if *field == KEY_FIELD {
            return self.cite_key().map(str::to_string);
        }

        let result = self.field_or_alias(field).or_else(|| {
            database
                .and_then(|db| db.referenced_entry(self))
                .and_then(|referenced| referenced.field_or_alias(field))
        });

        match database {
            Some(db) => result.map(|text| db.expand_strings(&text)),
            None => result,
        }
    }

    /// First non-empty resolution among `fields`, tried in order.
    pub fn resolved_field_or_alias_any(
        &self,
        fields: &OrFields,
        database: Option<&dyn EntryDatabase>,
    ) -> Option<String> {
        fields
            .iter()
            .filter_map(|field| self.resolved_field_or_alias(field, database))
            .find(|value| !value.is_empty())
    }

    /// Whether every group in `fields` resolves to a value.
    pub fn all_fields_present(&self, fields: &[OrFields], database: Option<&dyn EntryDatabase>) -> bool {
        fields
            .iter()
            .all(|group| self.resolved_field_or_alias_any(group, database).is_some())
    }

    /// Markup-normalized value of `field`, memoized until the field changes.
    ///
    /// The type header resolves to the type display name and the citation
    /// key is returned verbatim.
    pub fn latex_free_field(&self, field: &Field) -> Option<String> {
        if field.is_type_header() {
            return Some(
                self.cache
                    .latex_free_or_insert_with(field, || self.entry_type.display_name()),
            );
        }

        let raw = self.fields.get(field)?;
        if *field == KEY_FIELD {
            return Some(self.cache.latex_free_or_insert_with(field, || raw.clone()));
        }
        Some(
            self.cache
                .latex_free_or_insert_with(field, || self.converter.convert(raw)),
        )
    }

    /// Words of the raw field value. Absent fields yield an empty set.
    pub fn field_as_words(&self, field: &Field) -> Arc<HashSet<String>> {
        match self.fields.get(field) {
            Some(raw) => self
                .cache
                .words_or_insert_with(field, || string_as_words(raw)),
            None => Arc::new(HashSet::new()),
        }
    }

    pub fn cite_key(&self) -> Option<&str> {
        self.field(&KEY_FIELD)
    }

    pub fn set_cite_key(&mut self, cite_key: impl Into<String>) -> Option<FieldChange> {
        self.set_field(KEY_FIELD, cite_key)
    }

    pub fn clear_cite_key(&mut self) -> Option<FieldChange> {
        self.clear_field(KEY_FIELD)
    }

    pub fn has_cite_key(&self) -> bool {
        self.cite_key().is_some_and(|key| !key.is_empty())
    }

    pub fn with_cite_key(mut self, cite_key: impl Into<String>) -> Self {
        self.set_cite_key(cite_key);
        self
    }

    /// Keywords parsed from the `keywords` field.
    pub fn keywords(&self, delimiter: char) -> KeywordList {
        self.field(&Field::Standard(StandardField::Keywords))
            .map(|value| KeywordList::parse(value, delimiter))
            .unwrap_or_default()
    }

    /// Keywords after crossref resolution and string expansion.
    pub fn resolved_keywords(&self, delimiter: char, database: Option<&dyn EntryDatabase>) -> KeywordList {
        self.resolved_field_or_alias(&Field::Standard(StandardField::Keywords), database)
            .map(|value| KeywordList::parse(&value, delimiter))
            .unwrap_or_default()
    }

    /// Writes `keywords` back; an empty list clears the field.
    pub fn put_keywords(&mut self, keywords: &KeywordList, delimiter: char) -> Option<FieldChange> {
        if keywords.is_empty() {
            return self.clear_field(StandardField::Keywords);
        }
        self.set_field(StandardField::Keywords, keywords.as_string(delimiter))
    }

    /// Adds one keyword unless an equal one exists. Blank input is ignored.
    pub fn add_keyword(&mut self, keyword: &str, delimiter: char) -> Option<FieldChange> {
        let keyword = Keyword::new(keyword)?;
        let mut keywords = self.keywords(delimiter);
        keywords.add(keyword);
        self.put_keywords(&keywords, delimiter)
    }

    pub fn add_keywords<I, S>(&mut self, keywords: I, delimiter: char) -> Vec<FieldChange>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keywords
            .into_iter()
            .filter_map(|keyword| self.add_keyword(keyword.as_ref(), delimiter))
            .collect()
    }

    pub fn remove_keywords(&mut self, to_remove: &KeywordList, delimiter: char) -> Option<FieldChange> {
        let mut keywords = self.keywords(delimiter);
        keywords.remove_all(to_remove);
        self.put_keywords(&keywords, delimiter)
    }

    pub fn replace_keywords(
        &mut self,
        to_replace: &KeywordList,
        replacement: Keyword,
        delimiter: char,
    ) -> Option<FieldChange> {
        let mut keywords = self.keywords(delimiter);
        keywords.replace_all(to_replace, replacement);
        self.put_keywords(&keywords, delimiter)
    }

    /// Files parsed from the `file` field; empty when unset.
    ///
    /// The returned list is a copy. Use `set_files` or `add_file` to persist
    /// changes.
    pub fn files(&self) -> Vec<LinkedFile> {
        self.field(&Field::Standard(StandardField::File))
            .map(parse_file_field)
            .unwrap_or_default()
    }

    pub fn set_files(&mut self, files: &[LinkedFile]) -> Option<FieldChange> {
        let new_value = write_file_field(files);
        if self.field(&Field::Standard(StandardField::File)) == Some(new_value.as_str()) {
            return None;
        }
        self.set_field(StandardField::File, new_value)
    }

    pub fn add_file(&mut self, file: LinkedFile) -> Option<FieldChange> {
        let mut files = self.files();
        files.push(file);
        self.set_files(&files)
    }

    /// Citation keys listed in a comma-separated link field such as `related`.
    pub fn entry_link_list(&self, field: &Field) -> Vec<String> {
        self.field(field)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_entry_link_list(&mut self, field: impl Into<Field>, keys: &[String]) -> Option<FieldChange> {
        self.set_field(field, keys.join(","))
    }

    pub fn set_month(&mut self, month: Month) -> Option<FieldChange> {
        self.set_field(StandardField::Month, month.jabref_format())
    }

    pub fn month(&self) -> Option<Month> {
        self.field_or_alias(&Field::Standard(StandardField::Month))
            .and_then(|value| Month::parse(&value))
    }

    /// Writes the year, month and day components present in `date`.
    pub fn set_date(&mut self, date: Date) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        changes.extend(self.set_field(StandardField::Year, date.year().to_string()));
        if let Some(month) = date.month() {
            changes.extend(self.set_month(month));
        }
        if let Some(day) = date.day() {
            changes.extend(self.set_field(StandardField::Day, day.to_string()));
        }
        changes
    }

    pub fn publication_date(&self) -> Option<Date> {
        self.field_or_alias(&Field::Standard(StandardField::Date))
            .and_then(|value| Date::parse(&value))
    }

    pub fn title(&self) -> Option<&str> {
        self.field(&Field::Standard(StandardField::Title))
    }

    pub fn doi(&self) -> Option<Doi> {
        self.field(&Field::Standard(StandardField::Doi))
            .and_then(Doi::parse)
    }

    /// Short description `Author: "Title" (Year)`.
    ///
    /// Truncates to `max_chars` characters plus `...`; `0` disables truncation.
    pub fn author_title_year(&self, max_chars: usize) -> String {
        let value_of = |field: StandardField| {
            self.field(&Field::Standard(field))
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };
        let text = format!(
            "{}: \"{}\" ({})",
            value_of(StandardField::Author),
            value_of(StandardField::Title),
            value_of(StandardField::Year)
        );
        if max_chars == 0 || text.chars().count() <= max_chars {
            return text;
        }
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }

    /// Stamps the configured timestamp field with the current time.
    ///
    /// Does nothing when created timestamps are disabled, or when the field
    /// is already set and overwriting is off.
    pub fn apply_timestamp(&mut self, preferences: &TimestampPreferences) -> Option<FieldChange> {
        if !preferences.include_created_timestamp() {
            return None;
        }
        let field = preferences.timestamp_field();
        if self.has_field(&field) && !preferences.overwrite_timestamp() {
            return None;
        }
        self.set_field(field, preferences.now())
    }

    /// Refreshes the timestamp field after an edit when modification
    /// timestamps are enabled. Always overwrites.
    pub fn apply_modified_timestamp(&mut self, preferences: &TimestampPreferences) -> Option<FieldChange> {
        if !preferences.include_modified_timestamp() {
            return None;
        }
        self.set_field(preferences.timestamp_field(), preferences.now())
    }

    pub fn parsed_serialization(&self) -> &str {
        &self.parsed_serialization
    }

    /// Records the text this entry was read from and marks it clean.
    pub fn set_parsed_serialization(&mut self, serialization: impl Into<String>) {
        self.parsed_serialization = serialization.into();
        self.changed = false;
    }

    /// Whether the parsed serialization is stale.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    /// Free text found before the entry in its source file.
    pub fn user_comments(&self) -> &str {
        &self.comments_before_entry
    }

    /// Stores comments with trailing whitespace removed.
    pub fn set_comments_before_entry(&mut self, comments: &str) {
        self.comments_before_entry = TRAILING_WHITESPACE_RE.replace(comments, "").into_owned();
    }

    pub fn shared_data(&self) -> &SharedEntryData {
        &self.shared
    }

    pub fn shared_data_mut(&mut self) -> &mut SharedEntryData {
        &mut self.shared
    }

    pub fn register_observer(&mut self, observer: Arc<dyn EntryObserver>) -> ObserverToken {
        self.observers.register(observer)
    }

    /// Unregisters one observer. Unknown tokens are tolerated.
    pub fn unregister_observer(&mut self, token: ObserverToken) -> bool {
        self.observers.unregister(token)
    }

    fn publish(&self, kind: EntryEventKind, change: &FieldChange, source: EventSource) {
        if self.observers.is_empty() {
            return;
        }
        self.observers
            .publish(&EntryEvent::new(kind, change.clone(), source));
    }

    fn resolve_with<F>(&self, field: &Field, value_of: F) -> Option<String>
    where
        F: Fn(&Field) -> Option<String>,
    {
        if let Some(value) = value_of(field).filter(|value| !value.is_empty()) {
            return Some(value);
        }

        if let Some(alias) = field.alias() {
            return value_of(&alias);
        }

        let component = match field {
            Field::Standard(StandardField::Date) => {
                let year = value_of(&Field::Standard(StandardField::Year));
                let month = value_of(&Field::Standard(StandardField::Month));
                let day = value_of(&Field::Standard(StandardField::Day));
                return Date::from_parts(year.as_deref(), month.as_deref(), day.as_deref())
                    .map(|date| date.normalized());
            }
            Field::Standard(
                component @ (StandardField::Year | StandardField::Month | StandardField::Day),
            ) => *component,
            _ => return None,
        };

        let text = value_of(&Field::Standard(StandardField::Date))?;
        let Some(date) = Date::parse(&text) else {
            debug!(
                "event=date_parse module=entry status=skipped field={} value_len={}",
                field,
                text.len()
            );
            return None;
        };

        match component {
            StandardField::Year => Some(date.year().to_string()),
            StandardField::Month => date.month().map(Month::jabref_format),
            _ => date.day().map(|day| day.to_string()),
        }
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies type, fields and comments under a fresh identifier.
///
/// Observers, cached values, the parsed serialization and shared-storage
/// data are not carried over.
impl Clone for Entry {
    fn clone(&self) -> Self {
        Self {
            id: generate_entry_id(),
            entry_type: self.entry_type.clone(),
            fields: self.fields.clone(),
            comments_before_entry: self.comments_before_entry.clone(),
            parsed_serialization: String::new(),
            changed: false,
            shared: SharedEntryData::default(),
            cache: DerivedValueCache::new(),
            converter: Arc::clone(&self.converter),
            observers: ObserverRegistry::new(),
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.fields == other.fields
            && self.comments_before_entry == other.comments_before_entry
    }
}

impl Eq for Entry {}

impl Debug for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("entry_type", &self.entry_type)
            .field("fields", &self.fields)
            .field("changed", &self.changed)
            .field("observers", &self.observers)
            .finish()
    }
}

/// Canonical text form; see `serialize::canonical_representation`.
impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&canonical_representation(self))
    }
}
