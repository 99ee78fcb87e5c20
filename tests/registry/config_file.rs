//! Registries configured from `metaindex.toml`

use crate::common::*;
use metaindex::CONFIG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn default_file_is_written_once_and_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    RegistryConfig::write_default_if_missing(&path).unwrap();
    let config = RegistryConfig::from_file(&path).unwrap();
    assert_eq!(config, RegistryConfig::default());

    let registry = IndexRegistry::builder("books")
        .index(books_by_recent())
        .config(config)
        .build()
        .unwrap();
    assert_eq!(registry.config().limits.max_key_depth, 16);
}

#[test]
fn depth_limit_from_file_rejects_deep_index() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[limits]\nmax_key_depth = 1\n").unwrap();

    let config = RegistryConfig::from_file(&path).unwrap();
    let err = IndexRegistry::builder("books")
        .index(books_by_author_year())
        .config(config)
        .build()
        .unwrap_err();
    assert!(matches!(err, IndexError::LimitExceeded(_)));
}

#[test]
fn dump_after_build_is_read_from_file() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "dump_after_build = true\n").unwrap();

    let config = RegistryConfig::from_file(&path).unwrap();
    assert!(config.dump_after_build);
    let registry = IndexRegistry::builder("books")
        .index(books_by_recent())
        .config(config)
        .build()
        .unwrap();
    assert!(registry.config().dump_after_build);
}

#[test]
fn malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[limits\nmax_key_depth = ").unwrap();

    let err = RegistryConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, IndexError::Config(_)));
}
