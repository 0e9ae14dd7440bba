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

//! Human readable reports of diagnostic tables
//!
//! [`dump_table`] renders a labeled report, with one line per entry produced by a caller
//! supplied formatter:
//!
//! ```text
//! mapName:
//!   header
//!   key=123, val=456
//! ```
//!
//! Output is written to any [`fmt::Write`] sink. A failing formatter or table aborts the dump,
//! lines already written stay in the sink.

use std::{convert::Infallible, error::Error, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    core::encode::WireEncode,
    table::{DiagTable, TableError},
    text::{CanonicalTextError, encode_pair},
};

/// Options of the table renderer
///
/// The default renders the two space indented report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpOptions {
    /// Number of spaces in front of the header and entry lines
    pub indent: usize,
    /// Maximum number of entries to render. Further entries are summarized in a single line.
    pub max_entries: Option<usize>,
}
impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            max_entries: None,
        }
    }
}

/// Errors that can occur while dumping a table
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// The table could not be read
    #[error("reading table: {0}")]
    Table(#[from] TableError),
    /// The entry formatter failed
    #[error("formatting entry {index}: {source}")]
    Entry {
        /// Zero based position of the entry
        index: usize,
        /// Error of the formatter
        source: Box<dyn Error + Send + Sync>,
    },
    /// An entry could not be written as canonical text
    #[error("encoding entry {index}: {source}")]
    Text {
        /// Zero based position of the entry
        index: usize,
        /// Error of the text codec
        source: CanonicalTextError,
    },
    /// The output sink failed
    #[error("writing dump output")]
    Fmt(#[from] fmt::Error),
}

/// Writes a labeled report of `table` with the default options.
///
/// The report consists of `label:`, the indented header and one indented line per entry, in the
/// iteration order of the table.
pub fn dump_table<T, W, F>(
    out: &mut W,
    table: &T,
    label: &str,
    header: &str,
    mut format: F,
) -> Result<(), DumpError>
where
    T: DiagTable,
    W: fmt::Write + ?Sized,
    F: FnMut(&T::Key, &T::Value) -> String,
{
    try_dump_table(out, table, label, header, |key, value| {
        Ok::<_, Infallible>(format(key, value))
    })
}

/// Like [`dump_table`], with a formatter that may fail
pub fn try_dump_table<T, W, F, E>(
    out: &mut W,
    table: &T,
    label: &str,
    header: &str,
    format: F,
) -> Result<(), DumpError>
where
    T: DiagTable,
    W: fmt::Write + ?Sized,
    F: FnMut(&T::Key, &T::Value) -> Result<String, E>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    try_dump_table_with(&DumpOptions::default(), out, table, label, header, format)
}

/// Writes a labeled report of `table` according to `options`
pub fn try_dump_table_with<T, W, F, E>(
    options: &DumpOptions,
    out: &mut W,
    table: &T,
    label: &str,
    header: &str,
    mut format: F,
) -> Result<(), DumpError>
where
    T: DiagTable,
    W: fmt::Write + ?Sized,
    F: FnMut(&T::Key, &T::Value) -> Result<String, E>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    let indent = options.indent;
    writeln!(out, "{label}:")?;
    writeln!(out, "{:indent$}{header}", "")?;

    let mut entries = table.entries()?;
    let mut rendered = 0;
    while let Some(entry) = entries.next() {
        if options.max_entries.is_some_and(|max| rendered >= max) {
            // The current entry is not rendered either
            entry?;
            let remaining = 1 + count_entries(&mut entries)?;
            writeln!(out, "{:indent$}... {remaining} more entries", "")?;
            break;
        }

        let (key, value) = entry?;
        let line = format(&key, &value).map_err(|err| DumpError::Entry {
            index: rendered,
            source: err.into(),
        })?;
        writeln!(out, "{:indent$}{line}", "")?;
        rendered += 1;
    }

    tracing::trace!(label, rendered, "Dumped table");
    Ok(())
}

fn count_entries<K, V>(
    mut entries: impl Iterator<Item = Result<(K, V), TableError>>,
) -> Result<usize, TableError> {
    entries.try_fold(0, |count, entry| entry.map(|_| count + 1))
}

/// Renders a labeled report of `table` into a new string
pub fn render_table<T, F>(
    table: &T,
    label: &str,
    header: &str,
    format: F,
) -> Result<String, DumpError>
where
    T: DiagTable,
    F: FnMut(&T::Key, &T::Value) -> String,
{
    let mut out = String::new();
    dump_table(&mut out, table, label, header, format)?;
    Ok(out)
}

/// Writes every entry of `table` as one canonical text line.
///
/// The output can be restored with
/// [`MemoryTable::from_canonical_lines`](crate::table::MemoryTable::from_canonical_lines).
pub fn dump_raw_table<T, W>(out: &mut W, table: &T) -> Result<(), DumpError>
where
    T: DiagTable,
    T::Key: WireEncode,
    T::Value: WireEncode,
    W: fmt::Write + ?Sized,
{
    for (index, entry) in table.entries()?.enumerate() {
        let (key, value) = entry?;
        let line =
            encode_pair(&key, &value).map_err(|source| DumpError::Text { index, source })?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Writes a single status line, `<label>: OK` if every entry of `table` can be read, otherwise
/// `<label>: ERROR <reason>`.
pub fn dump_table_status<T, W>(out: &mut W, table: &T, label: &str) -> fmt::Result
where
    T: DiagTable,
    W: fmt::Write + ?Sized,
{
    let status = table.entries().and_then(|entries| count_entries(entries));
    match status {
        Ok(_) => writeln!(out, "{label}: OK"),
        Err(err) => {
            tracing::debug!(label, %err, "Table is not readable");
            writeln!(out, "{label}: ERROR {err}")
        }
    }
}
