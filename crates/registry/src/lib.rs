//! Registries of composite indexes
//!
//! - [`IndexRegistry`]: index of indexes keyed by value type and key types
//! - [`LinkedIndexManager`]: primary registry plus cascading autofill into
//!   indexes of self-indexing types
//! - [`RegistryConfig`]: limits and diagnostics loaded from `metaindex.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod linked;
pub mod registry;

pub use config::{RegistryConfig, CONFIG_FILE_NAME};
pub use linked::{Link, LinkId, LinkedIndexManager};
pub use registry::{IndexRegistry, IndexRegistryBuilder};
