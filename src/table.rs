//! Memoization table for unconditioned model counts.
//!
//! Maps a node to the number of satisfying assignments of the variables from the node's own
//! index down to the last variable, i.e. *not* yet scaled for variables skipped above the node.
//! Entries are insert-if-absent: once a node's count is known it never changes.
//!
//! A table is tied to one diagram. It is filled by [`ModelCounter`][crate::sat::ModelCounter] and
//! read by [`ConditionedModelCounter`][crate::conditioned::ConditionedModelCounter].

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;

use log::debug;
use num_bigint::BigUint;

use crate::error::CountError;

pub struct CountTable<N> {
    map: HashMap<N, BigUint>,
    limit: Option<usize>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<N> Default for CountTable<N> {
    fn default() -> Self {
        Self::new(10)
    }
}

impl<N> CountTable<N> {
    /// Create a new unbounded table with room for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        Self::with_limit(bits, None)
    }

    /// Create a new table holding at most `limit` entries.
    pub fn with_limit(bits: usize, limit: Option<usize>) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");
        let capacity = limit.map_or(1 << bits, |limit| limit.min(1 << bits));
        Self {
            map: HashMap::with_capacity(capacity),
            limit,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Get the number of lookups that found an entry.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of lookups that found nothing.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Forget every entry, e.g. before reusing the table for another diagram.
    pub fn clear(&mut self) {
        self.map.clear();
        self.hits.set(0);
        self.misses.set(0);
    }
}

impl<N> CountTable<N>
where
    N: Copy + Eq + Hash,
{
    /// Look up the count of `node`.
    pub fn get(&self, node: &N) -> Option<&BigUint> {
        match self.map.get(node) {
            Some(count) => {
                self.hits.set(self.hits.get() + 1);
                Some(count)
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    pub fn contains(&self, node: &N) -> bool {
        self.map.contains_key(node)
    }

    /// Record the count of `node` unless it is already known.
    pub fn insert(&mut self, node: N, count: BigUint) -> Result<(), CountError> {
        if self.map.contains_key(&node) {
            return Ok(());
        }
        if let Some(limit) = self.limit {
            if self.map.len() >= limit {
                debug!("count table is full ({} entries)", limit);
                return Err(CountError::ResourceExhausted { limit: Some(limit) });
            }
        }
        self.map
            .try_reserve(1)
            .map_err(|_| CountError::ResourceExhausted { limit: None })?;
        self.map.insert(node, count);
        Ok(())
    }
}
