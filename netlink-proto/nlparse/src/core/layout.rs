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

//! Static field layouts of kernel structures
//!
//! Layouts are the source of truth for the structure of kernel records. A [`StructLayout`] is an
//! ordered list of [`Field`]s, each with a fixed width and byte order. Fields are contiguous, the
//! kernel ABI structures described here carry no implicit padding.
//!
//! All layouts are `const` items, so sizes and offsets are computed at compile time:
//!
//! ```
//! use nlparse::core::layout::{ByteOrder, Field, StructLayout};
//!
//! const PAIR: StructLayout = StructLayout::new(
//!     "pair",
//!     &[
//!         Field::u8("tag"),
//!         Field::u32("value", ByteOrder::Little),
//!     ],
//! );
//! const VALUE_OFFSET: usize = PAIR.offset_of(1);
//!
//! assert_eq!(PAIR.size_bytes(), 5);
//! assert_eq!(VALUE_OFFSET, 1);
//! ```

use std::ops::Range;

/// Trait representing the layout of a kernel structure
pub trait Layout {
    /// Returns the expected size of the layout in bytes
    fn size_bytes(&self) -> usize;

    /// Attempts to split the buffer into two at the size of the layout
    /// Returns None if the buffer is too small
    #[inline]
    fn split_off_checked<'a>(&self, buf: &'a [u8]) -> Option<(&'a [u8], &'a [u8])> {
        buf.split_at_checked(self.size_bytes())
    }

    /// Like [`Layout::split_off_checked`], reporting a too small buffer as [`DecodeError`]
    #[inline]
    fn split_off_or_err<'a>(
        &self,
        at: &'static str,
        buf: &'a [u8],
    ) -> Result<(&'a [u8], &'a [u8]), DecodeError> {
        self.split_off_checked(buf)
            .ok_or(DecodeError::BufferTooSmall {
                at,
                required: self.size_bytes(),
                actual: buf.len(),
            })
    }
}

/// Errors that can occur when decoding a kernel structure from a byte slice
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
pub enum DecodeError {
    /// The buffer is too small to contain the expected layout
    #[error("Buffer too small at {at}: required {required}, actual {actual}")]
    BufferTooSmall {
        /// Location where the buffer was too small
        at: &'static str,
        /// Number of bytes required
        required: usize,
        /// Number of bytes actually available
        actual: usize,
    },
    /// The address family selects no known socket identifier variant
    #[error("Unsupported address family at {at}: {family}")]
    UnsupportedFamily {
        /// Location of the discriminant
        at: &'static str,
        /// The raw family value
        family: u8,
    },
    /// An advertised length does not match the structure it describes
    #[error("Invalid length at {at}: advertised {advertised}, actual {actual}")]
    InvalidLength {
        /// Location of the length field
        at: &'static str,
        /// Advertised length
        advertised: usize,
        /// Length required or available
        actual: usize,
    },
}
impl DecodeError {
    /// Returns true if the failure is expected while talking to an evolving kernel ABI.
    ///
    /// Recoverable errors mean the caller may retry with more data or skip the message.
    /// Everything else indicates corrupted input.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DecodeError::BufferTooSmall { .. } | DecodeError::UnsupportedFamily { .. }
        )
    }
}

/// Byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}
impl ByteOrder {
    /// Byte order of the host, used by the kernel for most structure fields
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;
    /// Byte order of the host, used by the kernel for most structure fields
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;
    /// Network byte order, used for ports and addresses
    pub const NETWORK: ByteOrder = ByteOrder::Big;
}

/// Represents a range of bytes relative to the start of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// Start byte (inclusive)
    pub start: usize,
    /// End byte (exclusive)
    pub end: usize,
}
impl ByteRange {
    /// Creates a new ByteRange with the given start and length
    #[inline]
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Returns the length of the range in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the range covers no bytes
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the standard Range representation
    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Checks if the given byte offset is contained within the range
    #[inline]
    pub const fn contains(&self, byte: usize) -> bool {
        byte >= self.start && byte < self.end
    }

    /// Shifts the range forward by the given number of bytes
    #[inline]
    pub const fn shift(mut self, bytes: usize) -> Self {
        self.start += bytes;
        self.end += bytes;
        self
    }
}

/// Type of a single structure field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `__u8`
    U8,
    /// `__u16`
    U16,
    /// `__u32`
    U32,
    /// `__u64`
    U64,
    /// Fixed length byte array
    Bytes(usize),
    /// Nested structure
    Struct(&'static StructLayout),
}
impl FieldType {
    /// Returns the width of the field in bytes
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        match *self {
            FieldType::U8 => 1,
            FieldType::U16 => 2,
            FieldType::U32 => 4,
            FieldType::U64 => 8,
            FieldType::Bytes(len) => len,
            FieldType::Struct(layout) => layout.size_bytes(),
        }
    }

    /// Returns true for unsigned integer fields
    #[inline]
    pub const fn is_uint(&self) -> bool {
        matches!(
            self,
            FieldType::U8 | FieldType::U16 | FieldType::U32 | FieldType::U64
        )
    }
}

/// A named field of a [`StructLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, as in the kernel header
    pub name: &'static str,
    /// Field type
    pub ty: FieldType,
    /// Byte order of the field. Ignored for single bytes, arrays and nested structures.
    pub order: ByteOrder,
}
impl Field {
    /// A single byte field
    pub const fn u8(name: &'static str) -> Self {
        Self {
            name,
            ty: FieldType::U8,
            order: ByteOrder::NATIVE,
        }
    }

    /// A two byte unsigned integer field
    pub const fn u16(name: &'static str, order: ByteOrder) -> Self {
        Self {
            name,
            ty: FieldType::U16,
            order,
        }
    }

    /// A four byte unsigned integer field
    pub const fn u32(name: &'static str, order: ByteOrder) -> Self {
        Self {
            name,
            ty: FieldType::U32,
            order,
        }
    }

    /// An eight byte unsigned integer field
    pub const fn u64(name: &'static str, order: ByteOrder) -> Self {
        Self {
            name,
            ty: FieldType::U64,
            order,
        }
    }

    /// A fixed length byte array
    pub const fn bytes(name: &'static str, len: usize) -> Self {
        Self {
            name,
            ty: FieldType::Bytes(len),
            order: ByteOrder::NETWORK,
        }
    }

    /// A nested structure
    pub const fn nested(name: &'static str, layout: &'static StructLayout) -> Self {
        Self {
            name,
            ty: FieldType::Struct(layout),
            order: ByteOrder::NATIVE,
        }
    }

    /// Returns the width of the field in bytes
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.ty.size_bytes()
    }
}

/// Position and byte order of a field within its structure
///
/// Slots are what views and models use to read and write fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSlot {
    /// Bytes occupied by the field
    pub range: ByteRange,
    /// Byte order of the field
    pub order: ByteOrder,
}

/// Ordered, contiguous field list of a fixed size kernel structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructLayout {
    /// Structure name, as in the kernel header
    pub name: &'static str,
    /// Fields in declaration order
    pub fields: &'static [Field],
}
impl StructLayout {
    /// Creates a new layout from its fields
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Returns the total size of the structure in bytes
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.offset_of(self.fields.len())
    }

    /// Returns the byte offset of the field at `index`.
    ///
    /// `index == fields.len()` yields the total size.
    pub const fn offset_of(&self, index: usize) -> usize {
        assert!(index <= self.fields.len(), "field index out of bounds");

        let mut offset = 0;
        let mut i = 0;
        while i < index {
            offset += self.fields[i].size_bytes();
            i += 1;
        }
        offset
    }

    /// Returns the slot of the field at `index`
    pub const fn slot(&self, index: usize) -> FieldSlot {
        let field = &self.fields[index];
        FieldSlot {
            range: ByteRange::new(self.offset_of(index), field.size_bytes()),
            order: field.order,
        }
    }

    /// Returns the index of the field with the given name
    pub const fn index_of(&self, name: &str) -> Option<usize> {
        let mut i = 0;
        while i < self.fields.len() {
            if const_str_eq(self.fields[i].name, name) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Returns the slot of the field with the given name.
    ///
    /// Intended for `const` contexts, where an unknown name fails compilation.
    pub const fn slot_named(&self, name: &str) -> FieldSlot {
        match self.index_of(name) {
            Some(index) => self.slot(index),
            None => panic!("unknown field name"),
        }
    }

    /// Looks up a field by name, returning its byte range and descriptor
    pub fn field(&self, name: &str) -> Option<(ByteRange, &'static Field)> {
        let index = self.index_of(name)?;
        Some((self.slot(index).range, &self.fields[index]))
    }

    /// Iterates over all fields with their byte ranges
    pub fn slots(&self) -> impl Iterator<Item = (ByteRange, &'static Field)> {
        let fields: &'static [Field] = self.fields;
        fields.iter().scan(0usize, |offset, field| {
            let range = ByteRange::new(*offset, field.size_bytes());
            *offset = range.end;
            Some((range, field))
        })
    }
}
impl Layout for StructLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        StructLayout::size_bytes(self)
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }

    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Macros for layout definitions
pub mod macros {
    /// Helper macro to generate field slot constants from a layout
    macro_rules! gen_slot_const {
        ($slot_name:ident, $layout:expr, $field:literal) => {
            #[doc = concat!("Slot of the `", $field, "` field")]
            pub const $slot_name: $crate::core::layout::FieldSlot = $layout.slot_named($field);
        };
    }

    pub(crate) use gen_slot_const;
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER: StructLayout = StructLayout::new(
        "inner",
        &[
            Field::u16("port", ByteOrder::Big),
            Field::bytes("addr", 6),
        ],
    );

    const OUTER: StructLayout = StructLayout::new(
        "outer",
        &[
            Field::u8("kind"),
            Field::u8("flags"),
            Field::nested("inner", &INNER),
            Field::u32("count", ByteOrder::Little),
            Field::u64("cookie", ByteOrder::NATIVE),
        ],
    );

    #[test]
    fn should_sum_field_sizes() {
        assert_eq!(INNER.size_bytes(), 8);
        assert_eq!(OUTER.size_bytes(), 1 + 1 + 8 + 4 + 8);
        assert_eq!(Layout::size_bytes(&OUTER), 22);
    }

    #[test]
    fn should_compute_offsets_in_declaration_order() {
        assert_eq!(OUTER.offset_of(0), 0);
        assert_eq!(OUTER.offset_of(2), 2);
        assert_eq!(OUTER.offset_of(3), 10);
        assert_eq!(OUTER.offset_of(4), 14);
        assert_eq!(OUTER.offset_of(5), OUTER.size_bytes());
    }

    #[test]
    fn should_resolve_slots_by_name() {
        const COUNT: FieldSlot = OUTER.slot_named("count");
        assert_eq!(COUNT.range, ByteRange::new(10, 4));
        assert_eq!(COUNT.order, ByteOrder::Little);

        assert_eq!(OUTER.index_of("cookie"), Some(4));
        assert_eq!(OUTER.index_of("missing"), None);
        assert!(OUTER.field("missing").is_none());

        let (range, field) = OUTER.field("inner").expect("inner exists");
        assert_eq!(range, ByteRange::new(2, 8));
        assert_eq!(field.ty, FieldType::Struct(&INNER));
    }

    #[test]
    fn should_iterate_contiguous_slots() {
        let ranges: Vec<_> = OUTER.slots().map(|(range, _)| range).collect();
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(ranges.first().map(|r| r.start), Some(0));
        assert_eq!(ranges.last().map(|r| r.end), Some(OUTER.size_bytes()));
    }

    #[test]
    fn should_report_short_buffers() {
        let buf = [0u8; 21];
        assert_eq!(
            OUTER.split_off_or_err("outer", &buf),
            Err(DecodeError::BufferTooSmall {
                at: "outer",
                required: 22,
                actual: 21
            })
        );

        let buf = [0u8; 30];
        let (head, rest) = OUTER.split_off_or_err("outer", &buf).expect("fits");
        assert_eq!(head.len(), 22);
        assert_eq!(rest.len(), 8);
    }

    #[test]
    fn should_classify_recoverable_errors() {
        assert!(
            DecodeError::UnsupportedFamily {
                at: "family",
                family: 7
            }
            .is_recoverable()
        );
        assert!(
            !DecodeError::InvalidLength {
                at: "len",
                advertised: 3,
                actual: 16
            }
            .is_recoverable()
        );
    }
}
