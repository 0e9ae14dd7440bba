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

//! Utility for formatting field-level annotations for debugging purposes
//!
//! [`FieldDump`] renders a buffer against a [`StructLayout`], one line per field:
//!
//! ```text
//! inet_diag_msg (72 bytes, 72 available)
//! 0x0000    idiag_family             02                       = 2
//! 0x0004    id                       inet_diag_sockid
//! 0x0004      idiag_sport            1F90                     = 8080
//! ```
//!
//! Fields which lie beyond the end of the buffer are shown as `n/a`, which makes the dump useful
//! for truncated kernel messages.

use std::fmt::{self, Write as FmtWrite};

use crate::core::{
    layout::{ByteRange, FieldSlot, FieldType, StructLayout},
    read::unchecked_slot_read,
};

/// Formats bytes as contiguous upper case hex, e.g. `7B000000`
pub fn to_hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String can not fail
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// Field annotated rendering of a buffer
pub struct FieldDump<'a> {
    layout: &'static StructLayout,
    buf: &'a [u8],
}
impl<'a> FieldDump<'a> {
    /// Creates a dump of `buf`, interpreted as `layout` starting at offset 0
    pub fn new(layout: &'static StructLayout, buf: &'a [u8]) -> Self {
        Self { layout, buf }
    }

    /// Writes the dump to the given output
    pub fn fmt_into(&self, out: &mut impl FmtWrite) -> fmt::Result {
        writeln!(
            out,
            "{} ({} bytes, {} available)",
            self.layout.name,
            self.layout.size_bytes(),
            self.buf.len()
        )?;
        self.fmt_fields(out, self.layout, 0, 1)
    }

    fn fmt_fields(
        &self,
        out: &mut impl FmtWrite,
        layout: &StructLayout,
        base: usize,
        depth: usize,
    ) -> fmt::Result {
        const NAME_WIDTH: usize = 24;
        const HEX_WIDTH: usize = 24;

        for (range, field) in layout.slots() {
            let range = range.shift(base);
            let indent = depth * 2;
            let name_width = NAME_WIDTH.saturating_sub(indent - 2);

            if let FieldType::Struct(nested) = field.ty {
                writeln!(
                    out,
                    "0x{:04X}  {:indent$}{:<name_width$} {}",
                    range.start, "", field.name, nested.name
                )?;
                self.fmt_fields(out, nested, range.start, depth + 1)?;
                continue;
            }

            let hex = self
                .bytes(range)
                .map(to_hex_string)
                .unwrap_or_else(|| "n/a".to_string());
            write!(
                out,
                "0x{:04X}  {:indent$}{:<name_width$} {:<HEX_WIDTH$}",
                range.start, "", field.name, hex
            )?;

            if field.ty.is_uint() {
                match self.bytes(range) {
                    Some(_) => {
                        let slot = FieldSlot {
                            range,
                            order: field.order,
                        };
                        // SAFETY: range was checked to be within buffer
                        let value = unsafe { unchecked_slot_read::<u64>(self.buf, slot) };
                        write!(out, " = {value}")?;
                    }
                    None => write!(out, " = n/a")?,
                }
            }
            writeln!(out)?;
        }

        Ok(())
    }

    fn bytes(&self, range: ByteRange) -> Option<&'a [u8]> {
        self.buf.get(range.range())
    }
}
impl fmt::Display for FieldDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_into(f)
    }
}
