//! Collection-side collaborators used during field resolution.
//!
//! # Responsibility
//! - Define the seam through which an entry reaches its crossref parent and
//!   the string-macro table.
//! - Provide an in-memory collection for embedding and tests.
//!
//! # Invariants
//! - Macro expansion terminates, even for self-referencing macros.

use crate::model::entry::Entry;
use crate::model::field::{Field, StandardField};
use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static STRING_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([^#\s]+)#").expect("valid string reference regex"));

const MAX_EXPANSION_DEPTH: usize = 16;

/// Collection capabilities consumed by crossref-aware resolution.
pub trait EntryDatabase {
    /// Returns the entry that `entry` inherits fields from, if any.
    fn referenced_entry(&self, entry: &Entry) -> Option<&Entry>;

    /// Expands string-macro references embedded in `text`.
    fn expand_strings(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Entries plus `@string` macros, held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    entries: Vec<Entry>,
    strings: HashMap<String, String>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entry_by_cite_key(&self, cite_key: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.cite_key() == Some(cite_key))
    }

    /// Defines or replaces one string macro. Names are case-insensitive.
    pub fn set_string(&mut self, name: &str, content: impl Into<String>) {
        self.strings
            .insert(name.trim().to_lowercase(), content.into());
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }
}

impl EntryDatabase for InMemoryDatabase {
    fn referenced_entry(&self, entry: &Entry) -> Option<&Entry> {
        let crossref = entry.field(&Field::Standard(StandardField::Crossref))?;
        self.entry_by_cite_key(crossref.trim())
    }

    /// Replaces `#name#` with the macro content; unknown names stay as-is.
    fn expand_strings(&self, text: &str) -> String {
        let mut current = text.to_string();
        for _ in 0..MAX_EXPANSION_DEPTH {
            let mut replaced_any = false;
            let next = STRING_REFERENCE_RE
                .replace_all(&current, |caps: &Captures<'_>| match self.string(&caps[1]) {
                    Some(content) => {
                        replaced_any = true;
                        content.to_string()
                    }
                    None => caps[0].to_string(),
                })
                .into_owned();
            if !replaced_any {
                return next;
            }
            current = next;
        }

        warn!(
            "event=string_expansion module=database status=truncated max_depth={}",
            MAX_EXPANSION_DEPTH
        );
        current
    }
}
