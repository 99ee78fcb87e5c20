//! Registry and index dumps

use crate::common::*;

fn small_registry() -> IndexRegistry {
    let mut registry = IndexRegistry::builder("recent")
        .index(books_by_recent())
        .build()
        .unwrap();
    fill(&mut registry, &catalog()[..2]);
    registry
}

#[test]
fn dump_text_is_deterministic() {
    let lotr = "Book { isbn: \"978-0261103252\", title: \"The Lord of the Rings\", \
author: Some(Author { name: \"tolkien\", country: \"uk\" }), year: 1954, \
tags: [\"fantasy\"], editors: [] }";
    let hobbit = "Book { isbn: \"978-0261102217\", title: \"The Hobbit\", \
author: Some(Author { name: \"tolkien\", country: \"uk\" }), year: 1937, \
tags: [\"fantasy\", \"classic\"], editors: [] }";
    let expected = [
        "registry 'recent' (1 indexes, depth 2)".to_string(),
        "index 'books by recent'".to_string(),
        "  value type: Book".to_string(),
        "  key types: [RecentKey desc]".to_string(),
        "  autofill: true".to_string(),
        "  size: 2".to_string(),
        format!("    {} <- [RecentKey:1954]", lotr),
        format!("    {} <- [RecentKey:1937]", hobbit),
    ]
    .join("\n")
        + "\n";

    assert_eq!(small_registry().to_string(), expected);
    assert_eq!(small_registry().to_string(), small_registry().to_string());
}

#[test]
fn dump_json_is_machine_readable() {
    let dumps = small_registry().dump();
    let json = dumps[0].to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["title"], "books by recent");
    assert_eq!(parsed["autofill_capable"], true);
    assert_eq!(parsed["key_types"][0], "RecentKey desc");
    assert_eq!(parsed["entries"][0]["keys"][0], "RecentKey:1954");
}

#[test]
fn enumerate_entries_rebuilds_key_sequences() {
    let mut registry = book_registry();
    fill(&mut registry, &catalog());
    let index = registry
        .lookup::<Book>(&[KeyType::of::<Author>(), KeyType::of::<YearKey>()])
        .unwrap();

    for (book, keys) in index.enumerate_entries() {
        let expected = KeySequence::new()
            .with(book.author.as_ref().unwrap())
            .with(&YearKey(book.year));
        assert_eq!(keys, expected);
    }
}
