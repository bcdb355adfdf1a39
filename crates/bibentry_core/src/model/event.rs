//! Change events and the per-entry observer registry.
//!
//! # Responsibility
//! - Describe every observable mutation of an entry.
//! - Deliver events synchronously to observers registered at call time.
//!
//! # Invariants
//! - Each registered observer receives each event exactly once, on the
//!   mutating thread, before the mutating call returns.
//! - Unregistering an unknown token is tolerated and only logged.

use crate::model::field::Field;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Origin of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Edit made in this process.
    #[default]
    Local,
    /// Edit imported from the shared-storage synchronization layer.
    Shared,
    /// Edit replayed by undo/redo.
    Undo,
    /// Edit applied by a save action.
    SaveAction,
}

/// Description of one field mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Identifier of the entry that owned the field at mutation time.
    pub entry_id: String,
    pub field: Field,
    /// `None` means the field did not exist before.
    pub old_value: Option<String>,
    /// `None` means the field was removed.
    pub new_value: Option<String>,
}

impl FieldChange {
    pub fn new(
        entry_id: impl Into<String>,
        field: Field,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            field,
            old_value,
            new_value,
        }
    }
}

/// Kind of an entry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryEventKind {
    FieldAdded,
    FieldChanged,
    FieldRemoved,
    TypeChanged,
}

/// Event published to entry observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryEvent {
    pub kind: EntryEventKind,
    pub change: FieldChange,
    pub source: EventSource,
}

impl EntryEvent {
    pub fn new(kind: EntryEventKind, change: FieldChange, source: EventSource) -> Self {
        Self {
            kind,
            change,
            source,
        }
    }
}

/// Receiver of entry events.
///
/// Observers run on the mutating thread; a panicking observer is not
/// isolated from the caller.
pub trait EntryObserver: Send + Sync {
    fn on_entry_event(&self, event: &EntryEvent);
}

impl<F> EntryObserver for F
where
    F: Fn(&EntryEvent) + Send + Sync,
{
    fn on_entry_event(&self, event: &EntryEvent) {
        self(event)
    }
}

/// Subscription handle returned by `ObserverRegistry::register`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverToken(u64);

/// Token-keyed observer registry scoped to one entry.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: BTreeMap<ObserverToken, Arc<dyn EntryObserver>>,
    next_token: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one observer and returns its token.
    pub fn register(&mut self, observer: Arc<dyn EntryObserver>) -> ObserverToken {
        let token = ObserverToken(self.next_token);
        self.next_token += 1;
        self.observers.insert(token, observer);
        token
    }

    /// Removes one observer. Returns whether the token was registered.
    pub fn unregister(&mut self, token: ObserverToken) -> bool {
        if self.observers.remove(&token).is_some() {
            return true;
        }
        debug!(
            "event=observer_unregister module=entry status=ignored reason=unknown_token token={}",
            token.0
        );
        false
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Publishes one event to every registered observer.
    pub fn publish(&self, event: &EntryEvent) {
        trace!(
            "event=entry_event module=entry kind={:?} field={} observers={}",
            event.kind,
            event.change.field,
            self.observers.len()
        );
        for observer in self.observers.values() {
            observer.on_entry_event(event);
        }
    }
}

impl Debug for ObserverRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
