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

//! Utilities for decoding byte buffers into owned models
//!
//! Every fixed size kernel structure implements [`WireDecode`]. The trait ties a model to its
//! static [`StructLayout`], so generic code (e.g. the canonical text codec) knows how many bytes
//! a record occupies before touching the buffer.

use crate::core::layout::{DecodeError, Layout, StructLayout};

/// Allows decoding from wire format.
pub trait WireDecode: Sized {
    /// Layout of the structure on the wire
    const LAYOUT: &'static StructLayout;

    /// Decodes the structure from the start of the buffer.
    ///
    /// Decoding may still fail for buffers of sufficient size, e.g. if a discriminant selects no
    /// known variant.
    ///
    /// ## SAFETY
    /// The buffer must be at least `Self::LAYOUT.size_bytes()` bytes long.
    unsafe fn decode_unchecked(buf: &[u8]) -> Result<Self, DecodeError>;

    /// Decodes the structure from the start of the buffer.
    ///
    /// Returns the decoded model and the bytes following the structure.
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        let (record_buf, rest) = Self::LAYOUT.split_off_or_err(Self::LAYOUT.name, buf)?;

        // SAFETY: split_off_or_err guarantees the required size
        let record = unsafe { Self::decode_unchecked(record_buf)? };

        Ok((record, rest))
    }

    /// Decodes the structure from a buffer which must contain exactly one structure.
    fn decode_exact(buf: &[u8]) -> Result<Self, DecodeError> {
        let required = Self::LAYOUT.size_bytes();
        if buf.len() > required {
            return Err(DecodeError::InvalidLength {
                at: Self::LAYOUT.name,
                advertised: buf.len(),
                actual: required,
            });
        }

        Self::decode(buf).map(|(record, _rest)| record)
    }
}
