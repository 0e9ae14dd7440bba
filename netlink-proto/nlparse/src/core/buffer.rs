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

//! Cursor over a kernel receive buffer
//!
//! Kernel messages are nested: a netlink header is followed by a family specific structure,
//! which may be followed by attributes. [`DiagBuffer`] keeps a cursor into the receive buffer so
//! the decoders of each level compose, while still allowing reads at absolute offsets.

use crate::core::{decode::WireDecode, layout::DecodeError};

/// Read-only cursor over a byte buffer supplied by the kernel transport
#[derive(Debug, Clone, Copy)]
pub struct DiagBuffer<'a> {
    buf: &'a [u8],
    position: usize,
}
impl<'a> DiagBuffer<'a> {
    /// Creates a new cursor at the start of the buffer
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Returns the total length of the underlying buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if the underlying buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the current cursor position
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to an absolute position.
    ///
    /// The position may equal the buffer length, which leaves nothing remaining.
    pub fn set_position(&mut self, position: usize) -> Result<(), DecodeError> {
        if position > self.buf.len() {
            return Err(DecodeError::BufferTooSmall {
                at: "position",
                required: position,
                actual: self.buf.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Returns the number of bytes between the cursor and the end of the buffer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining_from(self.position)
    }

    /// Returns the number of bytes between `offset` and the end of the buffer
    #[inline]
    pub fn remaining_from(&self, offset: usize) -> usize {
        self.buf.len().saturating_sub(offset)
    }

    /// Returns the bytes from the cursor to the end of the buffer
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        self.buf.get(self.position..).unwrap_or_default()
    }

    /// Returns `len` bytes at an absolute offset, without moving the cursor
    pub fn slice_at(
        &self,
        at: &'static str,
        offset: usize,
        len: usize,
    ) -> Result<&'a [u8], DecodeError> {
        offset
            .checked_add(len)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or(DecodeError::BufferTooSmall {
                at,
                required: len,
                actual: self.remaining_from(offset),
            })
    }

    /// Reads a single byte at an absolute offset, without moving the cursor
    pub fn u8_at(&self, at: &'static str, offset: usize) -> Result<u8, DecodeError> {
        self.slice_at(at, offset, 1).map(|bytes| bytes[0])
    }

    /// Decodes a structure at an absolute offset.
    ///
    /// On success the cursor is moved to the end of the decoded structure. On failure the cursor
    /// is left untouched.
    pub fn read_at<T: WireDecode>(&mut self, offset: usize) -> Result<T, DecodeError> {
        let region = self.buf.get(offset..).unwrap_or_default();
        let (record, _rest) = T::decode(region)?;
        self.position = offset + T::LAYOUT.size_bytes();
        Ok(record)
    }

    /// Decodes a structure at the cursor and advances past it
    pub fn read<T: WireDecode>(&mut self) -> Result<T, DecodeError> {
        self.read_at(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{U16, U32};

    #[test]
    fn should_track_position_and_remaining() {
        let bytes = [0u8; 10];
        let mut buf = DiagBuffer::new(&bytes);
        assert_eq!(buf.remaining(), 10);

        buf.set_position(4).expect("in bounds");
        assert_eq!(buf.position(), 4);
        assert_eq!(buf.remaining(), 6);
        assert_eq!(buf.rest().len(), 6);
        assert_eq!(buf.remaining_from(12), 0);

        buf.set_position(10).expect("end is a valid position");
        assert_eq!(buf.remaining(), 0);
        assert!(buf.set_position(11).is_err());
        assert_eq!(buf.position(), 10);
    }

    #[test]
    fn should_advance_after_read() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u32.to_ne_bytes());
        bytes.extend_from_slice(&9u16.to_ne_bytes());
        let mut buf = DiagBuffer::new(&bytes);

        assert_eq!(buf.read::<U32>(), Ok(U32(7)));
        assert_eq!(buf.position(), 4);
        assert_eq!(buf.read::<U16>(), Ok(U16(9)));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn should_report_insufficient_data_without_moving() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut buf = DiagBuffer::new(&bytes);
        buf.set_position(1).expect("in bounds");

        assert_eq!(
            buf.read_at::<U32>(2),
            Err(DecodeError::BufferTooSmall {
                at: "u32",
                required: 4,
                actual: 3
            })
        );
        assert!(buf.read_at::<U32>(9).is_err());
        assert_eq!(buf.position(), 1);
    }

    #[test]
    fn should_read_at_absolute_offsets() {
        let bytes = [10u8, 11, 12, 13];
        let buf = DiagBuffer::new(&bytes);
        assert_eq!(buf.u8_at("test", 2), Ok(12));
        assert_eq!(buf.slice_at("test", 1, 3), Ok(&bytes[1..]));
        assert!(buf.slice_at("test", 2, 3).is_err());
        assert!(buf.slice_at("test", usize::MAX, 2).is_err());
        assert_eq!(buf.position(), 0);
    }
}
