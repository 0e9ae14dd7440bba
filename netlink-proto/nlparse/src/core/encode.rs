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

//! Utilities for encoding model representations into byte buffers
//!
//! Models are encoded in two steps. [`WireEncode::wire_valid`] first rejects every model the
//! kernel layout can not hold, then [`WireEncode::encode_unchecked`] writes the fields at their
//! layout slots. Decoding a successfully encoded model yields the same model again, so
//! validation also rejects values which would decode differently, e.g. an `Other` variant
//! carrying the raw value of a named variant.

/// Allows encoding to wire format.
pub trait WireEncode {
    /// Returns the size required for the wire encoding.
    ///
    /// ## Safety
    /// This size must be correct, it is used to validate buffer sizes in `encode`.
    /// If it is smaller than the encoded size, undefined behavior will occur.
    fn required_size(&self) -> usize;

    /// Checks that the model can be represented in its kernel layout.
    fn wire_valid(&self) -> Result<(), InvalidStructureError>;

    /// Writes the wire encoding into the provided buffer.
    ///
    /// Returns the number of bytes written.
    ///
    /// ## SAFETY
    /// 1. The buffer must be at least `self.required_size()` bytes long
    /// 2. `self.wire_valid()` must return `Ok(())`
    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize;

    /// Validates the model and writes its wire encoding into the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.wire_valid()?;

        let required = self.required_size();
        if buf.len() < required {
            return Err(EncodeError::BufferTooSmall {
                required,
                actual: buf.len(),
            });
        }

        // SAFETY: model is valid and buffer length is checked above
        unsafe { Ok(self.encode_unchecked(buf)) }
    }

    /// Encodes into a newly allocated buffer of exactly `required_size()` bytes.
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![0u8; self.required_size()];
        let written = self.encode(&mut buf)?;
        debug_assert_eq!(written, buf.len());
        Ok(buf)
    }
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The model can not be represented in its kernel layout.
    #[error(transparent)]
    InvalidStructure(#[from] InvalidStructureError),
    /// The provided buffer is too small.
    #[error("buffer too small: required {required}, actual {actual}")]
    BufferTooSmall {
        /// Number of bytes the encoding needs
        required: usize,
        /// Number of bytes provided
        actual: usize,
    },
}

/// A model field which the kernel layout can not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum InvalidStructureError {
    /// A length field is smaller than the structure it prefixes
    #[error("{field} is {actual}, at least {minimum} is required")]
    LengthTooSmall {
        /// Kernel name of the length field
        field: &'static str,
        /// Smallest valid length
        minimum: usize,
        /// Length held by the model
        actual: usize,
    },
    /// A length field disagrees with the encoded size
    #[error("{field} is {actual}, but the encoding is {expected} bytes")]
    LengthMismatch {
        /// Kernel name of the length field
        field: &'static str,
        /// Size of the encoding
        expected: usize,
        /// Length held by the model
        actual: usize,
    },
    /// An `Other` variant holds the raw value of a named variant and would decode as that one
    #[error("{field} holds {raw} as an unnamed value, but {raw} has a named variant")]
    NonCanonicalVariant {
        /// Kernel name of the field
        field: &'static str,
        /// Raw value of the variant
        raw: u16,
    },
    /// A value has no room in the kernel layout
    #[error("{field} has no room in {layout}")]
    Unrepresentable {
        /// Name of the model field
        field: &'static str,
        /// Kernel structure lacking the field
        layout: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        valid: bool,
    }
    impl WireEncode for Fixed {
        fn required_size(&self) -> usize {
            2
        }

        fn wire_valid(&self) -> Result<(), InvalidStructureError> {
            if !self.valid {
                return Err(InvalidStructureError::Unrepresentable {
                    field: "fixed",
                    layout: "test",
                });
            }
            Ok(())
        }

        unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
            buf[..2].copy_from_slice(&[0xAB, 0xCD]);
            2
        }
    }

    #[test]
    fn should_validate_before_writing() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            Fixed { valid: false }.encode(&mut buf),
            Err(EncodeError::InvalidStructure(
                InvalidStructureError::Unrepresentable { .. }
            ))
        ));
        assert_eq!(buf, [0, 0]);
    }

    #[test]
    fn should_report_small_buffer() {
        assert_eq!(
            Fixed { valid: true }.encode(&mut [0u8; 1]),
            Err(EncodeError::BufferTooSmall {
                required: 2,
                actual: 1
            })
        );
        assert_eq!(Fixed { valid: true }.to_bytes(), Ok(vec![0xAB, 0xCD]));
    }
}
