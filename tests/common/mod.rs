//! Shared fixtures for the integration test suites.
//!
//! A small library catalog: books keyed by author, year and tags, authors
//! that are indexed on their own and also key the book indexes.
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Once;

pub use metaindex::{
    CompositeIndex, ExtractionRules, IndexError, IndexKey, IndexRegistry, Key, KeyItem,
    KeySequence, KeyType, LinkedIndexManager, Limits, RegistryConfig, SelfIndexing, SortOrder,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (visible with --nocapture).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Key types
// ============================================================================

/// Author of a book; indexed on its own and used as a key for books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub country: String,
}

impl IndexKey for Author {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Str(self.name.clone()))
    }
}

impl SelfIndexing for Author {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearKey(pub i64);

impl IndexKey for YearKey {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Int(self.0))
    }
}

/// Publication year, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentKey(pub i64);

impl IndexKey for RecentKey {
    const ORDER: SortOrder = SortOrder::Descending;

    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Int(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKey(pub String);

impl IndexKey for TagKey {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Str(self.0.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryKey(pub String);

impl IndexKey for CountryKey {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Str(self.0.clone()))
    }
}

// ============================================================================
// Values
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: Option<Author>,
    pub year: i64,
    pub tags: Vec<String>,
    pub editors: Vec<Author>,
}

impl IndexKey for Book {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Str(self.isbn.clone()))
    }
}

impl SelfIndexing for Book {}

pub fn author(name: &str, country: &str) -> Author {
    Author {
        name: name.to_string(),
        country: country.to_string(),
    }
}

pub fn book(isbn: &str, title: &str, author: Option<Author>, year: i64, tags: &[&str]) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author,
        year,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        editors: Vec::new(),
    }
}

/// Four books by three authors, one anonymous.
pub fn catalog() -> Vec<Book> {
    vec![
        book(
            "978-0261102217",
            "The Hobbit",
            Some(author("tolkien", "uk")),
            1937,
            &["fantasy", "classic"],
        ),
        book(
            "978-0261103252",
            "The Lord of the Rings",
            Some(author("tolkien", "uk")),
            1954,
            &["fantasy"],
        ),
        book(
            "978-0141439518",
            "Pride and Prejudice",
            Some(author("austen", "uk")),
            1813,
            &["classic", "romance"],
        ),
        book("978-0140449198", "Beowulf", None, 1000, &["epic"]),
    ]
}

// ============================================================================
// Extraction rules and indexes
// ============================================================================

pub fn book_rules() -> ExtractionRules<Book> {
    ExtractionRules::new()
        .one("author", |b: &Book| b.author.clone())
        .one("year", |b: &Book| Some(YearKey(b.year)))
        .one("recent", |b: &Book| Some(RecentKey(b.year)))
        .many("tags", |b: &Book| {
            b.tags.iter().cloned().map(TagKey).collect::<Vec<_>>()
        })
        .self_key::<Book>()
}

pub fn author_rules() -> ExtractionRules<Author> {
    ExtractionRules::new()
        .one("country", |a: &Author| Some(CountryKey(a.country.clone())))
        .self_key::<Author>()
}

pub fn books_by_author_year() -> CompositeIndex<Book> {
    CompositeIndex::new(
        "books by author, year",
        vec![KeyType::of::<Author>(), KeyType::of::<YearKey>()],
    )
    .expect("valid key types")
    .with_rules(book_rules())
}

pub fn books_by_tag() -> CompositeIndex<Book> {
    CompositeIndex::new(
        "books by tag, isbn",
        vec![KeyType::of::<TagKey>(), KeyType::of::<Book>()],
    )
    .expect("valid key types")
    .with_rules(book_rules())
}

pub fn books_by_recent() -> CompositeIndex<Book> {
    CompositeIndex::new("books by recent", vec![KeyType::of::<RecentKey>()])
        .expect("valid key types")
        .with_rules(book_rules())
}

pub fn authors_by_country() -> CompositeIndex<Author> {
    CompositeIndex::new(
        "authors by country",
        vec![KeyType::of::<CountryKey>(), KeyType::of::<Author>()],
    )
    .expect("valid key types")
    .with_rules(author_rules())
}

pub fn book_registry() -> IndexRegistry {
    IndexRegistry::builder("books")
        .index(books_by_author_year())
        .index(books_by_tag())
        .index(books_by_recent())
        .build()
        .expect("distinct signatures")
}

pub fn author_registry() -> IndexRegistry {
    IndexRegistry::builder("authors")
        .index(authors_by_country())
        .build()
        .expect("distinct signatures")
}

/// Autofill every book with its own key as self key.
pub fn fill(registry: &mut IndexRegistry, books: &[Book]) {
    for b in books {
        let self_key = b.to_key();
        registry
            .autofill(b, self_key.as_ref())
            .expect("autofill succeeds");
    }
}

pub fn titles(books: &[&Book]) -> Vec<String> {
    books.iter().map(|b| b.title.clone()).collect()
}
