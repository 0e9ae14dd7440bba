// Copyright 2026 Anapaya Systems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Key/value tables resembling kernel maps
//!
//! The dump renderers only need to iterate a table. [`DiagTable`] is that narrow interface, it
//! is implemented by handles to kernel maps outside of this crate and by [`MemoryTable`], an
//! in-memory table used for snapshots and tests.

use std::{
    collections::{BTreeMap, btree_map},
    error::Error,
};

use crate::{
    core::decode::WireDecode,
    text::{CanonicalTextError, decode_pair},
};

/// Error reported by a table while iterating
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TableError(Box<dyn Error + Send + Sync>);
impl TableError {
    /// Wraps an error of the table implementation
    pub fn new(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Ordered collection of key/value pairs
///
/// Implementations must yield their entries in a stable order, and the table must not change
/// while an iterator returned by [`DiagTable::entries`] is alive.
pub trait DiagTable {
    /// Key type
    type Key;
    /// Value type
    type Value;

    /// Returns an iterator over all entries.
    ///
    /// Fails if the table can not be read at all. Individual entries may fail as well, e.g. if an
    /// entry is deleted while the kernel walks the map.
    fn entries(
        &self,
    ) -> Result<
        impl Iterator<Item = Result<(Self::Key, Self::Value), TableError>> + '_,
        TableError,
    >;
}

/// A failed line of a canonical text snapshot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("snapshot line {line}: {source}")]
pub struct SnapshotError {
    /// One based line number
    pub line: usize,
    /// Decode error of the line
    #[source]
    pub source: CanonicalTextError,
}

/// In-memory table, iterated in key order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTable<K, V> {
    entries: BTreeMap<K, V>,
}
impl<K, V> Default for MemoryTable<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}
impl<K: Ord, V> MemoryTable<K, V> {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry, returning the previous value
    pub fn update_entry(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Removes an entry, returning its value
    pub fn delete_entry(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Returns the value stored for `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns true if the table holds an entry for `key`
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates the entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }
}
impl<K, V> MemoryTable<K, V>
where
    K: Ord + WireDecode,
    V: WireDecode,
{
    /// Restores a table from canonical text lines, as written by
    /// [`dump_raw_table`](crate::dump::dump_raw_table).
    ///
    /// Empty lines are skipped. Any other malformed line fails the whole restore. Later lines
    /// replace earlier lines with the same key.
    pub fn from_canonical_lines(text: &str) -> Result<Self, SnapshotError> {
        let mut table = Self::new();
        for (index, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let (key, value) = decode_pair(line).map_err(|source| {
                tracing::warn!(line = index + 1, %source, "Invalid canonical text in snapshot");
                SnapshotError {
                    line: index + 1,
                    source,
                }
            })?;
            table.update_entry(key, value);
        }
        Ok(table)
    }
}
impl<K, V> DiagTable for MemoryTable<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn entries(
        &self,
    ) -> Result<impl Iterator<Item = Result<(K, V), TableError>> + '_, TableError> {
        Ok(self
            .entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), value.clone()))))
    }
}
impl<K: Ord, V> FromIterator<(K, V)> for MemoryTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
impl<K: Ord, V> Extend<(K, V)> for MemoryTable<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
impl<'a, K, V> IntoIterator for &'a MemoryTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
