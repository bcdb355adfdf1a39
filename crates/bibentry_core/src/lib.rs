//! Core data layer for a single bibliographic entry.
//! This crate is the single source of truth for entry invariants.

pub mod config;
pub mod database;
pub mod logging;
pub mod model;
pub mod serialize;
pub mod text;

pub use config::{ConfigError, CoreConfig, LoggingConfig, TimestampPreferences};
pub use database::{EntryDatabase, InMemoryDatabase};
pub use logging::{
    default_log_level, init_logging, init_logging_from, init_logging_with, logging_status,
};
pub use model::date::Date;
pub use model::doi::Doi;
pub use model::entry::{generate_entry_id, Entry, EntryError};
pub use model::entry_type::{EntryType, StandardEntryType};
pub use model::event::{
    EntryEvent, EntryEventKind, EntryObserver, EventSource, FieldChange, ObserverToken,
};
pub use model::field::{
    Field, FieldNameError, InternalField, OrFields, StandardField, UnknownFieldName,
};
pub use model::keyword::{Keyword, KeywordList};
pub use model::linked_file::{parse_file_field, write_file_field, LinkedFile};
pub use model::month::Month;
pub use model::shared::SharedEntryData;
pub use serialize::{canonical_representation, EntryRecord, EntryRecordError};
pub use text::latex::{latex_to_unicode, LatexToUnicode, MarkupConverter};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
