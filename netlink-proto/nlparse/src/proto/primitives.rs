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

//! Fixed width integers as stored in kernel maps
//!
//! Map keys and values are plain integers in host byte order. The wrappers in this module give
//! them a [`StructLayout`] so they can be used with the canonical text codec and the dump
//! formatters like any other kernel structure.

use std::fmt;

use crate::core::{
    decode::WireDecode,
    encode::{InvalidStructureError, WireEncode},
    layout::{ByteOrder, DecodeError, Field, FieldSlot, StructLayout},
    read::unchecked_slot_read,
    write::unchecked_slot_write,
};

macro_rules! gen_primitive {
    ($(#[$meta:meta])* $name:ident, $repr:ty, $field:expr, $layout_name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub $repr);

        impl $name {
            /// Layout of the integer, a single host byte order field
            pub const LAYOUT: StructLayout =
                StructLayout::new($layout_name, &[$field]);
            const SLOT: FieldSlot = Self::LAYOUT.slot(0);
        }
        impl WireDecode for $name {
            const LAYOUT: &'static StructLayout = &$name::LAYOUT;

            unsafe fn decode_unchecked(buf: &[u8]) -> Result<Self, DecodeError> {
                // SAFETY: caller guarantees the buffer holds the layout
                Ok(Self(unsafe { unchecked_slot_read::<$repr>(buf, Self::SLOT) }))
            }
        }
        impl WireEncode for $name {
            fn required_size(&self) -> usize {
                Self::LAYOUT.size_bytes()
            }

            fn wire_valid(&self) -> Result<(), InvalidStructureError> {
                Ok(())
            }

            unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
                // SAFETY: caller guarantees the buffer holds the layout
                unsafe { unchecked_slot_write::<$repr>(buf, Self::SLOT, self.0) };
                Self::LAYOUT.size_bytes()
            }
        }
        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }
        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

gen_primitive!(
    /// Single byte key or value
    U8,
    u8,
    Field::u8("val"),
    "u8"
);
gen_primitive!(
    /// `__u16` key or value in host byte order
    U16,
    u16,
    Field::u16("val", ByteOrder::NATIVE),
    "u16"
);
gen_primitive!(
    /// `__u32` key or value in host byte order
    U32,
    u32,
    Field::u32("val", ByteOrder::NATIVE),
    "u32"
);
gen_primitive!(
    /// `__u64` key or value in host byte order
    U64,
    u64,
    Field::u64("val", ByteOrder::NATIVE),
    "u64"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_native_width() {
        assert_eq!(U8::LAYOUT.size_bytes(), 1);
        assert_eq!(U16::LAYOUT.size_bytes(), 2);
        assert_eq!(U32::LAYOUT.size_bytes(), 4);
        assert_eq!(U64::LAYOUT.size_bytes(), 8);
    }

    #[test]
    fn should_use_host_byte_order() {
        let bytes = 0x0102_0304u32.to_ne_bytes();
        assert_eq!(U32::decode_exact(&bytes), Ok(U32(0x0102_0304)));
        assert_eq!(U32(0x0102_0304).to_bytes().expect("valid"), bytes.to_vec());

        let bytes = u64::MAX.to_ne_bytes();
        assert_eq!(U64::decode_exact(&bytes), Ok(U64(u64::MAX)));
    }

    #[test]
    fn should_reject_wrong_length() {
        assert!(matches!(
            U32::decode_exact(&[1, 2, 3]),
            Err(DecodeError::BufferTooSmall { at: "u32", .. })
        ));
        assert!(matches!(
            U16::decode_exact(&[1, 2, 3]),
            Err(DecodeError::InvalidLength { at: "u16", .. })
        ));
    }

    #[test]
    fn should_display_inner_value() {
        assert_eq!(U32(456).to_string(), "456");
        assert_eq!(U8(7).to_string(), "7");
    }
}
