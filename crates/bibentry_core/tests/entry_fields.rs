use bibentry_core::{
    Entry, EntryEvent, EntryEventKind, EventSource, Field, StandardEntryType, StandardField,
    TimestampPreferences,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn recording(entry: &mut Entry) -> Arc<Mutex<Vec<EntryEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    entry.register_observer(Arc::new(move |event: &EntryEvent| {
        sink.lock().push(event.clone());
    }));
    events
}

fn title() -> Field {
    Field::Standard(StandardField::Title)
}

#[test]
fn set_then_get_returns_value_and_emits_added_then_changed() {
    let mut entry = Entry::new();
    let events = recording(&mut entry);

    let added = entry.set_field(StandardField::Title, "First").unwrap();
    assert_eq!(added.old_value, None);
    assert_eq!(entry.field(&title()), Some("First"));

    let changed = entry.set_field(StandardField::Title, "Second").unwrap();
    assert_eq!(changed.old_value.as_deref(), Some("First"));
    assert_eq!(changed.new_value.as_deref(), Some("Second"));
    assert_eq!(changed.entry_id, entry.id());

    let events = events.lock();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EntryEventKind::FieldAdded);
    assert_eq!(events[1].kind, EntryEventKind::FieldChanged);
    assert_eq!(events[1].source, EventSource::Local);
}

#[test]
fn setting_current_value_is_a_silent_no_op() {
    let mut entry = Entry::new().with_field(StandardField::Year, "2020");
    entry.set_changed(false);
    let events = recording(&mut entry);

    assert!(entry.set_field(StandardField::Year, "2020").is_none());
    assert!(!entry.has_changed());
    assert!(events.lock().is_empty());
}

#[test]
fn empty_value_clears_the_field() {
    let mut entry = Entry::new().with_field(StandardField::Note, "draft");
    let events = recording(&mut entry);

    let change = entry.set_field(StandardField::Note, "").unwrap();
    assert_eq!(change.old_value.as_deref(), Some("draft"));
    assert_eq!(change.new_value, None);
    assert!(!entry.has_field(&Field::Standard(StandardField::Note)));
    assert_eq!(events.lock()[0].kind, EntryEventKind::FieldRemoved);

    assert!(entry.set_field(StandardField::Note, "").is_none());
    assert_eq!(events.lock().len(), 1);
}

#[test]
fn clear_of_absent_field_returns_none() {
    let mut entry = Entry::new();
    assert!(entry.clear_field(StandardField::Title).is_none());
    assert!(!entry.has_changed());
}

#[test]
fn mutations_mark_dirty_and_parsed_serialization_cleans() {
    let mut entry = Entry::new();
    entry.set_field(StandardField::Author, "Knuth");
    assert!(entry.has_changed());

    entry.set_parsed_serialization("@misc{,\n  author = {Knuth}\n}");
    assert!(!entry.has_changed());
    assert!(entry.parsed_serialization().contains("Knuth"));

    entry.clear_field(StandardField::Author);
    assert!(entry.has_changed());
}

#[test]
fn event_source_is_propagated() {
    let mut entry = Entry::new();
    let events = recording(&mut entry);

    entry.set_field_with_source(StandardField::Title, "Imported", EventSource::Shared);
    entry.clear_field_with_source(StandardField::Title, EventSource::Undo);

    let events = events.lock();
    assert_eq!(events[0].source, EventSource::Shared);
    assert_eq!(events[1].source, EventSource::Undo);
}

#[test]
fn unregistered_observer_stops_receiving_and_unknown_token_is_tolerated() {
    let mut entry = Entry::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let token = entry.register_observer(Arc::new(move |event: &EntryEvent| {
        sink.lock().push(event.clone());
    }));

    assert!(entry.unregister_observer(token));
    assert!(!entry.unregister_observer(token));
    entry.set_field(StandardField::Title, "Quiet");
    assert!(events.lock().is_empty());
}

#[test]
fn set_type_emits_type_changed_once() {
    let mut entry = Entry::new();
    let events = recording(&mut entry);

    let change = entry.set_type(StandardEntryType::Article).unwrap();
    assert_eq!(change.old_value.as_deref(), Some("misc"));
    assert_eq!(change.new_value.as_deref(), Some("article"));
    assert!(entry.set_type(StandardEntryType::Article).is_none());

    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EntryEventKind::TypeChanged);
}

#[test]
fn bulk_set_applies_each_pair() {
    let mut entry = Entry::new().with_field(StandardField::Year, "2020");
    let changes = entry.set_fields([
        (StandardField::Year, "2020"),
        (StandardField::Title, "Bulk"),
        (StandardField::Author, "Someone"),
    ]);

    assert_eq!(changes.len(), 2);
    assert_eq!(entry.fields().len(), 3);
}

#[test]
fn set_field_if_present_ignores_none() {
    let mut entry = Entry::new();
    assert!(entry
        .set_field_if_present(StandardField::Title, None, EventSource::Local)
        .is_none());
    assert!(entry
        .set_field_if_present(
            StandardField::Title,
            Some("Given".to_string()),
            EventSource::Local
        )
        .is_some());
}

#[test]
fn cite_key_helpers_use_reserved_field() {
    let mut entry = Entry::new();
    assert!(!entry.has_cite_key());

    entry.set_cite_key("knuth1984");
    assert_eq!(entry.cite_key(), Some("knuth1984"));
    assert!(entry.has_cite_key());
    assert!(entry.has_field(&Field::parse("bibtexkey").unwrap()));

    assert!(entry.clear_cite_key().is_some());
    assert!(!entry.has_cite_key());
}

#[test]
fn equality_ignores_identifier_and_dirty_flag() {
    let first = Entry::with_type(StandardEntryType::Book)
        .with_field(StandardField::Title, "Same")
        .with_cite_key("same");
    let mut second = Entry::with_type(StandardEntryType::Book)
        .with_cite_key("same")
        .with_field(StandardField::Title, "Same");
    second.set_changed(false);

    assert_ne!(first.id(), second.id());
    assert_eq!(first, second);

    second.set_comments_before_entry("% note");
    assert_ne!(first, second);
}

#[test]
fn clone_gets_fresh_id_and_drops_observers() {
    let mut original = Entry::new().with_field(StandardField::Title, "Cloned");
    let events = recording(&mut original);

    let mut copy = original.clone();
    assert_ne!(copy.id(), original.id());
    assert_eq!(copy, original);

    copy.set_field(StandardField::Title, "Changed copy");
    assert!(events.lock().is_empty());
    assert_eq!(original.title(), Some("Cloned"));
}

#[test]
fn author_title_year_uses_placeholders_and_truncates() {
    let entry = Entry::new()
        .with_field(StandardField::Author, "Knuth")
        .with_field(StandardField::Title, "The Art of Computer Programming");

    assert_eq!(
        entry.author_title_year(0),
        "Knuth: \"The Art of Computer Programming\" (N/A)"
    );
    assert_eq!(entry.author_title_year(5), "Knuth...");
}

#[test]
fn apply_timestamp_respects_preferences() {
    let mut entry = Entry::new();
    let disabled = TimestampPreferences::default();
    assert!(entry.apply_timestamp(&disabled).is_none());

    let enabled = TimestampPreferences {
        use_timestamps: true,
        timestamp_format: "%Y".to_string(),
        ..TimestampPreferences::default()
    };
    assert!(entry.apply_timestamp(&enabled).is_some());
    let stamped = entry
        .field(&Field::Standard(StandardField::Timestamp))
        .unwrap()
        .to_string();
    assert_eq!(stamped.len(), 4);

    entry.set_field(StandardField::Timestamp, "keep");
    assert!(entry.apply_timestamp(&enabled).is_none());
    assert_eq!(
        entry.field(&Field::Standard(StandardField::Timestamp)),
        Some("keep")
    );

    let overwrite = TimestampPreferences {
        overwrite_timestamp: true,
        ..enabled
    };
    assert!(entry.apply_timestamp(&overwrite).is_some());
}

#[test]
fn entry_is_shareable_across_reader_threads() {
    let entry = Arc::new(
        Entry::new().with_field(StandardField::Title, r#"Stra\ss e und M{\"u}hle"#),
    );
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let entry = Arc::clone(&entry);
            std::thread::spawn(move || entry.latex_free_field(&Field::Standard(StandardField::Title)))
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap().as_deref(),
            Some("Straße und Mühle")
        );
    }
}

#[test]
fn deeply_nested_accents_do_not_exhaust_the_stack() {
    let title = format!("{}e", r"\'".repeat(3_000));
    let entry = Entry::new().with_field(StandardField::Title, title);
    let converted = entry
        .latex_free_field(&Field::Standard(StandardField::Title))
        .unwrap();
    assert!(converted.ends_with('e'));
}

#[test]
fn parsed_names_share_slots_with_standard_fields() {
    let mut entry = Entry::new();
    entry.set_field(StandardField::Title, "A");
    let change = entry.set_field(Field::parse("TITLE").unwrap(), "B").unwrap();
    assert_eq!(change.old_value.as_deref(), Some("A"));
    assert_eq!(entry.fields().len(), 1);

    entry.set_field(Field::parse("Venue").unwrap(), "C");
    let decoded: Entry = serde_json::from_value(serde_json::to_value(&entry).unwrap()).unwrap();
    assert_eq!(decoded, entry);
    assert_eq!(decoded.field(&Field::parse("venue").unwrap()), Some("C"));
}

#[test]
fn modified_timestamp_always_refreshes_when_enabled() {
    let mut entry = Entry::new().with_field(StandardField::Timestamp, "old");
    assert!(entry
        .apply_modified_timestamp(&TimestampPreferences::default())
        .is_none());

    let modified = TimestampPreferences {
        use_modified_timestamp: true,
        timestamp_format: "%Y".to_string(),
        ..TimestampPreferences::default()
    };
    let change = entry.apply_modified_timestamp(&modified).unwrap();
    assert_eq!(change.old_value.as_deref(), Some("old"));
    assert_eq!(change.new_value.map(|value| value.len()), Some(4));
}
