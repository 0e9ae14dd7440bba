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

use crate::core::layout::{ByteOrder, ByteRange, FieldSlot};

/// Trait for types that can be converted into a field write value
/// Required to use the `unchecked_slot_write` function.
pub trait IntoSlotWrite {
    /// Converts `Self` into a zero-extended 64 bit value
    fn into_write_value(v: Self) -> u64;
}

macro_rules! impl_into_u64 {
    ($($t:ty),*) => {
        $(
            impl IntoSlotWrite for $t {
                #[inline(always)]
                fn into_write_value(v: Self) -> u64 {
                    v as u64
                }
            }
        )*
    };
}
impl_into_u64!(u8, u16, u32, u64);

/// Writes an unsigned integer field into the buffer.
///
/// If a value exceeds the width of the slot, it will be truncated to fit.
///
/// SAFETY:
/// The caller must ensure that the buffer contains `slot.range`.
///
/// Parameters:
/// - buf: The buffer to write into, starting at the beginning of the structure.
/// - slot: The field slot to write. (at most 8 bytes)
/// - val: The value to write.
#[inline(always)]
pub unsafe fn unchecked_slot_write<T>(buf: &mut [u8], slot: FieldSlot, val: T)
where
    T: IntoSlotWrite,
{
    const LANE_BYTES: usize = 8;

    let range = slot.range;
    let width = range.len();

    debug_assert!(width <= LANE_BYTES, "FieldSlot too large for write");
    debug_assert!(range.end <= buf.len(), "write exceeds buffer");

    let val = T::into_write_value(val);

    // SAFETY: caller guarantees the range is within the buffer
    let dst = unsafe { buf.get_unchecked_mut(range.range()) };

    match slot.order {
        ByteOrder::Little => dst.copy_from_slice(&val.to_le_bytes()[..width]),
        ByteOrder::Big => dst.copy_from_slice(&val.to_be_bytes()[LANE_BYTES - width..]),
    }
}

/// Copies a byte array into the buffer.
///
/// SAFETY:
/// The caller must ensure that the buffer contains `range` and that `range.len() == bytes.len()`.
#[inline(always)]
pub unsafe fn unchecked_array_write(buf: &mut [u8], range: ByteRange, bytes: &[u8]) {
    debug_assert_eq!(range.len(), bytes.len(), "array length does not match range");
    debug_assert!(range.end <= buf.len(), "write exceeds buffer");

    // SAFETY: caller guarantees the range is within the buffer
    unsafe { buf.get_unchecked_mut(range.range()) }.copy_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: usize, len: usize, order: ByteOrder) -> FieldSlot {
        FieldSlot {
            range: ByteRange::new(start, len),
            order,
        }
    }

    #[test]
    fn should_write_little_endian_u32() {
        let mut buf = [0u8; 4];
        unsafe { unchecked_slot_write(&mut buf, slot(0, 4, ByteOrder::Little), 456u32) };
        assert_eq!(buf, [0xC8, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn should_write_big_endian_u16() {
        let mut buf = [0u8; 4];
        unsafe { unchecked_slot_write(&mut buf, slot(2, 2, ByteOrder::Big), 8080u16) };
        assert_eq!(buf, [0x00, 0x00, 0x1F, 0x90]);
    }

    #[test]
    fn should_preserve_neighbouring_bytes() {
        let mut buf = [0xAA; 6];
        unsafe { unchecked_slot_write(&mut buf, slot(1, 4, ByteOrder::Big), 0u32) };
        assert_eq!(buf, [0xAA, 0, 0, 0, 0, 0xAA]);
    }

    #[test]
    fn should_truncate_value() {
        let mut buf = [0u8; 3];
        unsafe { unchecked_slot_write(&mut buf, slot(0, 2, ByteOrder::Little), 0x0012_3456u32) };
        assert_eq!(buf, [0x56, 0x34, 0]);

        let mut buf = [0u8; 3];
        unsafe { unchecked_slot_write(&mut buf, slot(0, 2, ByteOrder::Big), 0x0012_3456u32) };
        assert_eq!(buf, [0x34, 0x56, 0]);
    }

    #[test]
    fn should_copy_arrays() {
        let mut buf = [0u8; 6];
        unsafe { unchecked_array_write(&mut buf, ByteRange::new(1, 3), &[7, 8, 9]) };
        assert_eq!(buf, [0, 7, 8, 9, 0, 0]);
    }
}
