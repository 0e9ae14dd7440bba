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

//! Utilities for reading kernel structures in place
//!
//! Views are zero-copy representations of kernel structures over byte buffers. They are only
//! used while decoding: models copy every field out of the view, so nothing outlives the receive
//! buffer.
//!
//! All views must be #[repr(transparent)] wrappers around `[u8]`, which allows interpreting a
//! byte slice as a view via transmute (`&[u8] == &View`).
//!
//! ### Safety
//!
//! Core invariant needing to be upheld is that the buffer which the view points to, is large enough
//! to read all fields of the view. [`View::has_required_size`] checks this before a buffer may be
//! interpreted.

use crate::core::layout::DecodeError;

/// Trait for views over byte buffers
pub trait View {
    /// Asserts that the buffer has the required size for the view.
    /// Returns the number of bytes used by the view.
    ///
    /// # Important
    ///
    /// This function ensures that all view functions are safe to call after it returns Ok.
    /// If this function is incorrectly implemented, it will lead to undefined behavior.
    fn has_required_size(buf: &[u8]) -> Result<usize, DecodeError>;

    /// Converts a slice into the view, returning the view and the bytes following it
    ///
    /// This function checks that the buffer is at least as large as required by the view.
    #[inline]
    fn from_slice(buf: &[u8]) -> Result<(&Self, &[u8]), DecodeError> {
        let size = Self::has_required_size(buf)?;

        debug_assert!(buf.len() >= size);

        // SAFETY: size is checked to be at least the required size
        let (view_buf, rest) = unsafe { buf.split_at_unchecked(size) };
        let view = unsafe { Self::from_slice_unchecked(view_buf) };

        Ok((view, rest))
    }

    /// Returns the underlying byte representation of the view
    fn as_bytes(&self) -> &[u8];

    /// Converts the slice into the view without checking sizes
    ///
    /// # Safety
    /// The caller must ensure that the buffer is at least as large as required by the view
    /// this is usually done by calling [View::has_required_size] before.
    unsafe fn from_slice_unchecked(buf: &[u8]) -> &Self;
}

pub(crate) mod macros {
    /// Macro to implement [`View`](crate::core::view::View) for a fixed size structure
    ///
    /// - $view: the #[repr(transparent)] view type
    /// - $layout: the `StructLayout` describing the structure
    macro_rules! impl_fixed_view {
        ($view:ty, $layout:expr) => {
            impl $crate::core::view::View for $view {
                #[inline]
                fn has_required_size(
                    buf: &[u8],
                ) -> Result<usize, $crate::core::layout::DecodeError> {
                    use $crate::core::layout::Layout;
                    let (view_buf, _rest) = $layout.split_off_or_err($layout.name, buf)?;
                    Ok(view_buf.len())
                }

                #[inline]
                unsafe fn from_slice_unchecked(buf: &[u8]) -> &Self {
                    // SAFETY: See View trait documentation
                    unsafe { ::std::mem::transmute(buf) }
                }

                #[inline]
                fn as_bytes(&self) -> &[u8] {
                    &self.0
                }
            }
        };
    }
    pub(crate) use impl_fixed_view;

    /// Macro to generate integer field readers - expects self to be a wrapper around [u8]
    ///
    /// - $name: name of the generated function
    /// - $slot: field slot of the field
    /// - $repr: representation type of the field
    macro_rules! gen_field_read {
        ($name:ident, $slot:expr, $repr:ty) => {
            #[inline]
            #[allow(unused)]
            /// Reads the field
            pub fn $name(&self) -> $repr {
                use $crate::core::read::unchecked_slot_read;
                // SAFETY: buffer size is checked on construction
                unsafe { unchecked_slot_read::<$repr>(&self.0, $slot) }
            }
        };
    }
    pub(crate) use gen_field_read;

    /// Macro to generate byte array field readers - expects self to be a wrapper around [u8]
    ///
    /// - $name: name of the generated function
    /// - $slot: field slot of the array
    /// - $len: length of the array
    macro_rules! gen_array_read {
        ($name:ident, $slot:expr, $len:expr) => {
            #[inline]
            #[allow(unused)]
            /// Copies the field
            pub fn $name(&self) -> [u8; $len] {
                use $crate::core::read::unchecked_array_read;
                // SAFETY: buffer size is checked on construction
                unsafe { unchecked_array_read::<{ $len }>(&self.0, $slot.range) }
            }
        };
    }
    pub(crate) use gen_array_read;
}
