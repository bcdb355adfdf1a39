//! Entry domain model.
//!
//! # Responsibility
//! - Define the entry aggregate and the value types it is built from.
//!
//! # Invariants
//! - `Entry` is the only mutation path into its field store.
//! - Value types (`Date`, `Month`, `Keyword`, `LinkedFile`, `Doi`) are
//!   immutable once parsed.

pub mod cache;
pub mod date;
pub mod doi;
pub mod entry;
pub mod entry_type;
pub mod event;
pub mod field;
pub mod keyword;
pub mod linked_file;
pub mod month;
pub mod shared;
