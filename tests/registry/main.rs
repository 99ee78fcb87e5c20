#[path = "../common/mod.rs"]
mod common;

mod catalog;
mod config_file;
mod diagnostics;
mod properties;
mod signatures;
