//! Registry construction and signature lookup

use crate::common::*;
use metaindex::{ErasedIndex, TypeTag};

// ============================================================================
// Build
// ============================================================================

#[test]
fn build_without_indexes_fails() {
    let err = IndexRegistry::build("nothing", Vec::new()).unwrap_err();
    assert!(matches!(err, IndexError::EmptyInput(_)));
    assert!(err.to_string().contains("nothing"));
}

#[test]
fn build_rejects_duplicate_signature() {
    let twin = CompositeIndex::<Book>::new(
        "twin",
        vec![KeyType::of::<Author>(), KeyType::of::<YearKey>()],
    )
    .unwrap();
    let err = IndexRegistry::builder("books")
        .index(books_by_author_year())
        .index(twin)
        .build()
        .unwrap_err();
    match err {
        IndexError::BuildFailure { registry, index } => {
            assert_eq!(registry, "books");
            assert_eq!(index, "twin");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn build_from_erased_indexes() {
    let indexes: Vec<Box<dyn ErasedIndex>> =
        vec![Box::new(books_by_recent()), Box::new(authors_by_country())];
    let registry = IndexRegistry::build("mixed", indexes).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.max_depth(), 3);
}

#[test]
fn order_of_key_types_is_part_of_signature() {
    let swapped = CompositeIndex::<Book>::new(
        "books by year, author",
        vec![KeyType::of::<YearKey>(), KeyType::of::<Author>()],
    )
    .unwrap()
    .with_rules(book_rules());
    let registry = IndexRegistry::builder("books")
        .index(books_by_author_year())
        .index(swapped)
        .build()
        .unwrap();

    let forward = registry
        .lookup::<Book>(&[KeyType::of::<Author>(), KeyType::of::<YearKey>()])
        .unwrap();
    let backward = registry
        .lookup::<Book>(&[KeyType::of::<YearKey>(), KeyType::of::<Author>()])
        .unwrap();
    assert_eq!(forward.title(), "books by author, year");
    assert_eq!(backward.title(), "books by year, author");
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn lookup_distinct_signatures_independently() {
    let registry = book_registry();
    assert_eq!(
        registry
            .lookup::<Book>(&[KeyType::of::<RecentKey>()])
            .unwrap()
            .title(),
        "books by recent"
    );
    assert_eq!(
        registry
            .lookup::<Book>(&[KeyType::of::<TagKey>(), KeyType::of::<Book>()])
            .unwrap()
            .title(),
        "books by tag, isbn"
    );
}

#[test]
fn lookup_with_wrong_value_type_is_not_found() {
    let registry = book_registry();
    let err = registry
        .lookup::<Author>(&[KeyType::of::<RecentKey>()])
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "No index found for value type Author with key types [RecentKey]"
    );
}

#[test]
fn indexes_for_lists_signatures_of_one_value_type() {
    let registry = IndexRegistry::builder("all")
        .index(books_by_author_year())
        .index(books_by_recent())
        .index(authors_by_country())
        .build()
        .unwrap();

    let books = registry.indexes_for(TypeTag::of::<Book>());
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|index| index.value_type().is::<Book>()));

    let authors = registry.indexes_for(TypeTag::of::<Author>());
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].title(), "authors by country");
}
