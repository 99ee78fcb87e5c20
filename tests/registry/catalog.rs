//! Catalog queries through a registry
//!
//! Books are inserted by autofill and read back through every registered
//! index: prefix queries, fully specified queries, wildcards and ordering.

use crate::common::*;

fn filled() -> IndexRegistry {
    init_tracing();
    let mut registry = book_registry();
    fill(&mut registry, &catalog());
    registry
}

fn author_year() -> [KeyType; 2] {
    [KeyType::of::<Author>(), KeyType::of::<YearKey>()]
}

// ============================================================================
// Prefix queries
// ============================================================================

#[test]
fn author_prefix_returns_books_in_year_order() {
    let registry = filled();
    let found = registry
        .query::<Book>(&author_year(), &KeySequence::of(&author("tolkien", "uk")))
        .unwrap();
    assert_eq!(titles(&found), vec!["The Hobbit", "The Lord of the Rings"]);
}

#[test]
fn fully_specified_query_returns_one_book() {
    let registry = filled();
    let keys = KeySequence::new()
        .with(&author("tolkien", "uk"))
        .with(&YearKey(1937));
    let found = registry.query::<Book>(&author_year(), &keys).unwrap();
    assert_eq!(titles(&found), vec!["The Hobbit"]);

    let missing = KeySequence::new()
        .with(&author("tolkien", "uk"))
        .with(&YearKey(2000));
    assert!(registry.query::<Book>(&author_year(), &missing).unwrap().is_empty());
}

#[test]
fn wildcard_first_position_filters_on_second() {
    let registry = filled();
    let keys = KeySequence::new().wildcard().with(&YearKey(1813));
    let found = registry.query::<Book>(&author_year(), &keys).unwrap();
    assert_eq!(titles(&found), vec!["Pride and Prejudice"]);
}

#[test]
fn anonymous_book_is_missing_from_author_index() {
    let registry = filled();
    let all = registry.query_all::<Book>(&author_year()).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|b| b.author.is_some()));
}

#[test]
fn query_by_key_on_tag_index() {
    let registry = filled();
    let found = registry
        .query_by_key::<Book, _>(&TagKey("classic".into()), &[KeyType::of::<Book>()])
        .unwrap();
    // ordered by isbn within the tag
    assert_eq!(titles(&found), vec!["Pride and Prejudice", "The Hobbit"]);
}

#[test]
fn tag_index_holds_one_entry_per_tag() {
    let registry = filled();
    let index = registry
        .lookup::<Book>(&[KeyType::of::<TagKey>(), KeyType::of::<Book>()])
        .unwrap();
    assert_eq!(index.size(), 6);
    assert_eq!(index.level_keys().len(), 4);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn descending_key_lists_newest_first() {
    let registry = filled();
    let found = registry.query_all::<Book>(&[KeyType::of::<RecentKey>()]).unwrap();
    assert_eq!(
        titles(&found),
        vec![
            "The Lord of the Rings",
            "The Hobbit",
            "Pride and Prejudice",
            "Beowulf"
        ]
    );
}

#[test]
fn select_all_orders_by_full_sequence() {
    let registry = filled();
    let found = registry.query_all::<Book>(&author_year()).unwrap();
    assert_eq!(
        titles(&found),
        vec!["Pride and Prejudice", "The Hobbit", "The Lord of the Rings"]
    );
}

// ============================================================================
// Explicit puts
// ============================================================================

#[test]
fn explicit_put_and_duplicate() {
    let mut registry = book_registry();
    let hobbit = catalog().remove(0);
    let keys = KeySequence::new()
        .with(&author("tolkien", "uk"))
        .with(&YearKey(1937));

    assert!(registry.put(&author_year(), hobbit.clone(), &keys).unwrap());
    assert!(!registry.put(&author_year(), hobbit, &keys).unwrap());
    assert_eq!(registry.query_all::<Book>(&author_year()).unwrap().len(), 1);
}

#[test]
fn put_with_wrong_key_type_is_invalid_key() {
    let mut registry = book_registry();
    let hobbit = catalog().remove(0);
    let keys = KeySequence::new().with(&YearKey(1937)).with(&YearKey(1937));

    let err = registry.put(&author_year(), hobbit, &keys).unwrap_err();
    assert!(matches!(err, IndexError::InvalidKey { .. }));
    assert_eq!(registry.query_all::<Book>(&author_year()).unwrap().len(), 0);
}

#[test]
fn put_with_null_key_is_rejected() {
    let mut registry = book_registry();
    let hobbit = catalog().remove(0);
    let keys = KeySequence::new().with(&author("tolkien", "uk")).wildcard();
    assert!(!registry.put(&author_year(), hobbit, &keys).unwrap());
}

#[test]
fn lookup_mut_allows_direct_puts() {
    let mut registry = book_registry();
    let index = registry
        .lookup_mut::<Book>(&[KeyType::of::<RecentKey>()])
        .unwrap();
    let beowulf = catalog().remove(3);
    assert!(index.put(beowulf, &KeySequence::of(&RecentKey(1000))).unwrap());
    assert_eq!(
        registry.query_all::<Book>(&[KeyType::of::<RecentKey>()]).unwrap().len(),
        1
    );
}
