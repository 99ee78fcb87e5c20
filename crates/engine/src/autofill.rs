//! Autofill: derive key sequences from extraction rules
//!
//! For each key type of the index, autofill gathers candidate keys from every
//! accessor registered for that key type, plus the caller's self key when the
//! key type is the declared self-key type. Every combination of candidates
//! (one per position, in position order) becomes one `put`.
//!
//! ```text
//! positions:  [AuthorKey]        [TagKey]
//! candidates: tolkien            fantasy, classic
//! puts:       [tolkien, fantasy] [tolkien, classic]
//! ```
//!
//! Candidates are gathered and validated before the first `put`, so an
//! autofill that fails with an error leaves the index untouched.
//!
//! Each branch of the fan-out owns its own copy of the partial sequence, so
//! sibling combinations never observe each other's keys. A failed branch
//! (null key, duplicate terminal key) turns the result into `false` but the
//! remaining branches still run.

use crate::index::CompositeIndex;
use metaindex_core::{IndexError, Key, KeyError, KeySequence, Result};
use tracing::{debug, warn};

/// Candidates per position, gathered before anything is written
struct Plan {
    positions: Vec<Vec<Option<Key>>>,
    missing_self_key: Option<usize>,
    combinations: usize,
}

impl Plan {
    fn is_complete(&self) -> bool {
        self.positions.iter().all(|candidates| !candidates.is_empty())
    }
}

impl<V: Clone> CompositeIndex<V> {
    /// Insert `value` under every key sequence its extraction rules derive
    ///
    /// `self_key` fills positions whose key type is the declared self-key
    /// type. Returns `Ok(false)` if any derived put was rejected or some
    /// position produced no key at all.
    ///
    /// # Errors
    ///
    /// - `NotAutofillCapable` if a key type has no extraction rule
    /// - `InvalidKey` if `self_key` is not of the declared self-key type
    /// - `LimitExceeded` if the fan-out exceeds `max_autofill_combinations`
    pub fn autofill(&mut self, value: &V, self_key: Option<&Key>) -> Result<bool> {
        let plan = self.plan(value, self_key)?;

        if let Some(position) = plan.missing_self_key {
            warn!(index = %self.title(), position, "autofill without self key");
        }
        if !plan.is_complete() {
            for (key_type, candidates) in self.key_types().iter().zip(&plan.positions) {
                if candidates.is_empty() {
                    debug!(
                        index = %self.title(),
                        key_type = %key_type,
                        "no keys derived for position"
                    );
                }
            }
            return Ok(false);
        }

        let all_inserted = self.fan_out(value, &plan.positions, KeySequence::new())?;
        if !all_inserted {
            debug!(
                index = %self.title(),
                combinations = plan.combinations,
                "autofill partially rejected"
            );
        }
        Ok(all_inserted)
    }

    /// Run every check `autofill` runs, without writing
    ///
    /// # Errors
    ///
    /// The errors `autofill` would return for the same arguments.
    pub fn check_autofill(&self, value: &V, self_key: Option<&Key>) -> Result<()> {
        self.plan(value, self_key).map(|_| ())
    }

    fn plan(&self, value: &V, self_key: Option<&Key>) -> Result<Plan> {
        let uncovered = self.uncovered_key_types();
        let root = match self.root.as_ref() {
            Some(root) if uncovered.is_empty() => root,
            _ => {
                let rendered: Vec<String> = uncovered.iter().map(|kt| kt.to_string()).collect();
                return Err(IndexError::NotAutofillCapable {
                    index: self.title().to_string(),
                    uncovered: format!("[{}]", rendered.join(", ")),
                });
            }
        };

        let mut positions: Vec<Vec<Option<Key>>> = Vec::with_capacity(self.depth());
        let mut missing_self_key = None;
        for (position, key_type) in self.key_types().iter().enumerate() {
            let mut candidates = Vec::new();

            if root.rules.self_key_type().as_ref() == Some(key_type) {
                match self_key {
                    Some(key) if key.key_type() == *key_type => candidates.push(Some(key.clone())),
                    Some(key) => {
                        return Err(IndexError::invalid_key(
                            self.title(),
                            KeyError::TypeMismatch {
                                position,
                                expected: key_type.to_string(),
                                found: key.key_type().to_string(),
                            },
                        ))
                    }
                    None => missing_self_key = missing_self_key.or(Some(position)),
                }
            }

            for extractor in root.rules.extractors_for(key_type) {
                candidates.extend(extractor.extract(value));
            }
            positions.push(candidates);
        }

        let combinations = positions
            .iter()
            .fold(1usize, |acc, c| acc.saturating_mul(c.len()));
        root.limits.validate_combinations(combinations)?;

        Ok(Plan {
            positions,
            missing_self_key,
            combinations,
        })
    }

    fn fan_out(
        &mut self,
        value: &V,
        positions: &[Vec<Option<Key>>],
        prefix: KeySequence,
    ) -> Result<bool> {
        let (candidates, rest) = match positions.split_first() {
            Some(split) => split,
            None => return self.put(value.clone(), &prefix),
        };

        let mut all_inserted = true;
        for candidate in candidates {
            let mut branch = prefix.clone();
            branch.push(candidate.clone());
            if !self.fan_out(value, rest, branch)? {
                all_inserted = false;
            }
        }
        Ok(all_inserted)
    }
}
