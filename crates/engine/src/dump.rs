//! Diagnostic dump of a composite index
//!
//! A dump captures title, value type, key types, autofill capability and
//! every (value, key sequence) entry. The text form is deterministic and meant
//! for logs and test output; the JSON form is for tooling. Neither is meant to
//! be parsed back.

use crate::index::CompositeIndex;
use serde::Serialize;
use std::fmt;

/// One stored value with its full key sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    /// `Debug` rendering of the value
    pub value: String,
    /// Rendered keys, one per position
    pub keys: Vec<String>,
}

/// Snapshot of an index for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDump {
    /// Index title
    pub title: String,
    /// Value type name
    pub value_type: String,
    /// Key type names
    pub key_types: Vec<String>,
    /// Whether every key type is covered by an extraction rule
    pub autofill_capable: bool,
    /// Number of stored values
    pub size: usize,
    /// Entries in ascending key order
    pub entries: Vec<DumpEntry>,
}

impl IndexDump {
    /// Pretty-printed JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for IndexDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "index '{}'", self.title)?;
        writeln!(f, "  value type: {}", self.value_type)?;
        writeln!(f, "  key types: [{}]", self.key_types.join(", "))?;
        writeln!(f, "  autofill: {}", self.autofill_capable)?;
        writeln!(f, "  size: {}", self.size)?;
        for entry in &self.entries {
            writeln!(f, "    {} <- [{}]", entry.value, entry.keys.join(", "))?;
        }
        Ok(())
    }
}

impl<V: fmt::Debug> CompositeIndex<V> {
    /// Capture a diagnostic snapshot of this index
    pub fn dump(&self) -> IndexDump {
        let entries: Vec<DumpEntry> = self
            .enumerate_entries()
            .into_iter()
            .map(|(value, keys)| DumpEntry {
                value: format!("{:?}", value),
                keys: keys
                    .iter()
                    .map(|slot| match slot {
                        Some(key) => key.to_string(),
                        None => "*".to_string(),
                    })
                    .collect(),
            })
            .collect();

        IndexDump {
            title: self.title().to_string(),
            value_type: self.value_type().to_string(),
            key_types: self.key_types().iter().map(|kt| kt.to_string()).collect(),
            autofill_capable: self.is_autofill_capable(),
            size: entries.len(),
            entries,
        }
    }
}
