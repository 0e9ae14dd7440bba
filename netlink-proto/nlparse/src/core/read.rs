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

/// Trait for types that can be constructed from a field read
/// Required to use the `unchecked_slot_read` function.
pub trait FromSlotRead {
    /// Converts the zero-extended field value into `Self`
    fn from_slot_read(v: u64) -> Self;
}

macro_rules! impl_from_u64 {
    ($($t:ty),*) => {
        $(
            impl FromSlotRead for $t {
                #[inline(always)]
                fn from_slot_read(v: u64) -> Self {
                    v as $t
                }
            }
        )*
    };
}
impl_from_u64!(u8, u16, u32, u64);

/// Reads an unsigned integer field from the buffer.
///
/// The field is interpreted in the byte order of the slot and zero-extended to 64 bits before
/// conversion.
///
/// SAFETY:
/// The caller must ensure that the buffer contains `slot.range`.
///
/// Parameters:
/// - buf: The buffer to read from, starting at the beginning of the structure.
/// - slot: The field slot to read. (at most 8 bytes)
#[inline(always)]
pub unsafe fn unchecked_slot_read<T>(buf: &[u8], slot: FieldSlot) -> T
where
    T: FromSlotRead,
{
    const LANE_BYTES: usize = 8;

    let range = slot.range;
    let width = range.len();

    debug_assert!(width <= LANE_BYTES, "FieldSlot too large for read");
    debug_assert!(range.end <= buf.len(), "read exceeds buffer");

    // SAFETY: caller guarantees the range is within the buffer
    let src = unsafe { buf.get_unchecked(range.range()) };

    let mut lane = [0u8; LANE_BYTES];
    let value = match slot.order {
        // Lane holds the field in its low bytes: vv00 0000
        ByteOrder::Little => {
            lane[..width].copy_from_slice(src);
            u64::from_le_bytes(lane)
        }
        // Lane holds the field in its high addresses: 0000 00vv
        ByteOrder::Big => {
            lane[LANE_BYTES - width..].copy_from_slice(src);
            u64::from_be_bytes(lane)
        }
    };

    T::from_slot_read(value)
}

/// Copies a fixed length byte array out of the buffer.
///
/// SAFETY:
/// The caller must ensure that the buffer contains `range` and that `range.len() == N`.
#[inline(always)]
pub unsafe fn unchecked_array_read<const N: usize>(buf: &[u8], range: ByteRange) -> [u8; N] {
    debug_assert_eq!(range.len(), N, "array length does not match range");
    debug_assert!(range.end <= buf.len(), "read exceeds buffer");

    let mut out = [0u8; N];
    // SAFETY: caller guarantees the range is within the buffer
    out.copy_from_slice(unsafe { buf.get_unchecked(range.start..range.start + N) });
    out
}
