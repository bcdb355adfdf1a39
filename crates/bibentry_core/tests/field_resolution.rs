use bibentry_core::{
    Date, Entry, EntryDatabase, Field, InMemoryDatabase, InternalField, MarkupConverter, Month,
    OrFields, StandardEntryType, StandardField,
};
use std::sync::Arc;

struct UppercaseConverter;

impl MarkupConverter for UppercaseConverter {
    fn convert(&self, text: &str) -> String {
        text.to_uppercase()
    }
}

fn field(name: StandardField) -> Field {
    Field::Standard(name)
}

#[test]
fn alias_falls_back_in_both_directions() {
    let location_only = Entry::new().with_field(StandardField::Location, "Berlin");
    assert_eq!(
        location_only.field_or_alias(&field(StandardField::Address)).as_deref(),
        Some("Berlin")
    );

    let address_only = Entry::new().with_field(StandardField::Address, "Paris");
    assert_eq!(
        address_only.field_or_alias(&field(StandardField::Location)).as_deref(),
        Some("Paris")
    );
}

#[test]
fn direct_value_wins_over_alias() {
    let entry = Entry::new()
        .with_field(StandardField::Journal, "J. Short")
        .with_field(StandardField::JournalTitle, "Journal Long");
    assert_eq!(
        entry.field_or_alias(&field(StandardField::Journal)).as_deref(),
        Some("J. Short")
    );
}

#[test]
fn alias_is_a_single_hop_without_date_fallback() {
    let entry = Entry::new().with_field(StandardField::Title, "Only title");
    assert_eq!(entry.field_or_alias(&field(StandardField::School)), None);
    assert_eq!(entry.field_or_alias(&field(StandardField::Note)), None);
}

#[test]
fn date_is_composed_from_year_and_month() {
    let entry = Entry::new()
        .with_field(StandardField::Year, "2020")
        .with_field(StandardField::Month, "mar");
    assert_eq!(
        entry.field_or_alias(&field(StandardField::Date)).as_deref(),
        Some("2020-03")
    );

    let full = Entry::new()
        .with_field(StandardField::Year, "2020")
        .with_field(StandardField::Month, "#mar#")
        .with_field(StandardField::Day, "9");
    assert_eq!(
        full.field_or_alias(&field(StandardField::Date)).as_deref(),
        Some("2020-03-09")
    );
}

#[test]
fn date_components_are_decomposed_from_date() {
    let entry = Entry::new().with_field(StandardField::Date, "2020-03");
    assert_eq!(
        entry.field_or_alias(&field(StandardField::Year)).as_deref(),
        Some("2020")
    );
    assert_eq!(
        entry.field_or_alias(&field(StandardField::Month)).as_deref(),
        Some("#mar#")
    );
    assert_eq!(entry.field_or_alias(&field(StandardField::Day)), None);
    assert_eq!(entry.month(), Some(Month::March));
}

#[test]
fn unparsable_date_resolves_to_nothing() {
    let entry = Entry::new().with_field(StandardField::Date, "sometime soon");
    assert_eq!(entry.field_or_alias(&field(StandardField::Year)), None);
    assert_eq!(entry.publication_date(), None);
}

#[test]
fn explicit_components_are_not_overridden_by_date() {
    let entry = Entry::new()
        .with_field(StandardField::Date, "2020-03")
        .with_field(StandardField::Year, "1999");
    assert_eq!(
        entry.field_or_alias(&field(StandardField::Year)).as_deref(),
        Some("1999")
    );
}

#[test]
fn set_date_writes_present_components() {
    let mut entry = Entry::new();
    let changes = entry.set_date(Date::year_month(2021, Month::July));
    assert_eq!(changes.len(), 2);
    assert_eq!(entry.field(&field(StandardField::Month)), Some("#jul#"));
    assert_eq!(entry.field(&field(StandardField::Day)), None);
    assert_eq!(
        entry.publication_date().map(|date| date.normalized()),
        Some("2021-07".to_string())
    );
}

#[test]
fn latex_free_resolution_uses_converted_values_and_refreshes() {
    let mut entry = Entry::new().with_field(StandardField::Location, r#"M{\"u}nchen"#);
    assert_eq!(
        entry
            .field_or_alias_latex_free(&field(StandardField::Address))
            .as_deref(),
        Some("München")
    );

    entry.set_field(StandardField::Location, r#"K{\"o}ln"#);
    assert_eq!(
        entry
            .field_or_alias_latex_free(&field(StandardField::Address))
            .as_deref(),
        Some("Köln")
    );
}

#[test]
fn latex_free_key_is_verbatim() {
    let entry = Entry::new().with_cite_key(r#"M\"uller--2020"#);
    assert_eq!(
        entry
            .latex_free_field(&Field::Internal(InternalField::KeyField))
            .as_deref(),
        Some(r#"M\"uller--2020"#)
    );
}

#[test]
fn crossref_supplies_missing_fields() {
    let mut database = InMemoryDatabase::new();
    database.insert_entry(
        Entry::with_type(StandardEntryType::Proceedings)
            .with_cite_key("proc")
            .with_field(StandardField::Title, "Foo")
            .with_field(StandardField::Location, "Vienna"),
    );
    let child = Entry::with_type(StandardEntryType::InProceedings)
        .with_field(StandardField::Crossref, "proc")
        .with_field(StandardField::Author, "Ada");

    let db: &dyn EntryDatabase = &database;
    assert_eq!(
        child
            .resolved_field_or_alias(&field(StandardField::Title), Some(db))
            .as_deref(),
        Some("Foo")
    );
    assert_eq!(
        child
            .resolved_field_or_alias(&field(StandardField::Address), Some(db))
            .as_deref(),
        Some("Vienna")
    );
    assert_eq!(
        child
            .resolved_field_or_alias(&field(StandardField::Author), Some(db))
            .as_deref(),
        Some("Ada")
    );
    assert_eq!(
        child.resolved_field_or_alias(&field(StandardField::Title), None),
        None
    );
}

#[test]
fn pseudo_fields_are_never_deferred_to_crossref() {
    let mut database = InMemoryDatabase::new();
    database.insert_entry(Entry::new().with_cite_key("parent"));
    let child = Entry::with_type(StandardEntryType::Article)
        .with_field(StandardField::Crossref, "parent");

    assert_eq!(
        child
            .resolved_field_or_alias(&Field::Internal(InternalField::KeyField), Some(&database))
            .as_deref(),
        None
    );
    assert_eq!(
        child
            .resolved_field_or_alias(
                &Field::Internal(InternalField::ObsoleteTypeHeader),
                Some(&database)
            )
            .as_deref(),
        Some("Article")
    );
}

#[test]
fn resolved_values_are_string_expanded() {
    let mut database = InMemoryDatabase::new();
    database.set_string("acm", "ACM Press");
    let entry = Entry::new().with_field(StandardField::Publisher, "#acm#");

    assert_eq!(
        entry
            .resolved_field_or_alias(&field(StandardField::Publisher), Some(&database))
            .as_deref(),
        Some("ACM Press")
    );
}

#[test]
fn or_fields_return_first_resolved_alternative() {
    let entry = Entry::new().with_field(StandardField::Editor, "Editor Name");
    let alternatives = OrFields::parse("author/editor").unwrap();

    assert_eq!(
        entry
            .resolved_field_or_alias_any(&alternatives, None)
            .as_deref(),
        Some("Editor Name")
    );
    assert!(entry.all_fields_present(&[alternatives], None));
    assert!(!entry.all_fields_present(&[OrFields::from(StandardField::Title)], None));
}

#[test]
fn doi_is_parsed_from_field() {
    let entry = Entry::new().with_field(StandardField::Doi, "https://doi.org/10.1145/1234.5678");
    assert_eq!(
        entry.doi().map(|doi| doi.as_str().to_string()),
        Some("10.1145/1234.5678".to_string())
    );
}

#[test]
fn custom_markup_converter_replaces_default_and_purges_cache() {
    let entry = Entry::new().with_field(StandardField::Title, r"Caf\'{e}");
    let title = field(StandardField::Title);
    assert_eq!(entry.latex_free_field(&title).as_deref(), Some("Café"));

    let entry = entry.with_markup_converter(Arc::new(UppercaseConverter));
    assert_eq!(entry.latex_free_field(&title).as_deref(), Some(r"CAF\'{E}"));
    assert_eq!(
        entry
            .field_or_alias_latex_free(&field(StandardField::Title))
            .as_deref(),
        Some(r"CAF\'{E}")
    );
}
