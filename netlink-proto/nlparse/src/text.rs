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

//! Canonical text encoding of key/value records
//!
//! A pair is written as the standard padded base64 of the key bytes, a single `,` and the base64
//! of the value bytes, e.g. `ewAAAA==,yAEAAA==` for the host byte order integers 123 and 456 on
//! a little endian host. The encoding contains no whitespace, so one pair fits on one line.
//!
//! Decoding is strict: the text must consist of exactly two parts, each part must be canonical
//! base64, decode to exactly the size of the target record and hold a representable record.

use std::fmt;

use base64::{Engine as _, prelude::BASE64_STANDARD};

use crate::core::{
    decode::WireDecode,
    encode::{EncodeError, WireEncode},
    layout::DecodeError,
};

/// Separator between the key and the value part
pub const DELIMITER: char = ',';

/// Part of a canonical text pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The key, before the delimiter
    Key,
    /// The value, after the delimiter
    Value,
}
impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Key => write!(f, "key"),
            Part::Value => write!(f, "value"),
        }
    }
}

/// Errors of the canonical text codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonicalTextError {
    /// The text did not consist of exactly a key and a value
    #[error("expected key and value separated by ',', found {0} part(s)")]
    PartCount(usize),
    /// A part is not valid standard padded base64
    #[error("invalid base64 in {part}: {source}")]
    InvalidBase64 {
        /// Failing part
        part: Part,
        /// Underlying base64 error
        #[source]
        source: base64::DecodeError,
    },
    /// A part decoded to a different number of bytes than the record occupies
    #[error("{part} decodes to {actual} bytes, expected {expected}")]
    LengthMismatch {
        /// Failing part
        part: Part,
        /// Size of the target record
        expected: usize,
        /// Number of decoded bytes
        actual: usize,
    },
    /// A part has the right size but does not hold a representable record
    #[error("{part} is not a valid record: {source}")]
    InvalidRecord {
        /// Failing part
        part: Part,
        /// Underlying decode error
        #[source]
        source: DecodeError,
    },
    /// A record could not be encoded
    #[error("cannot encode {part}: {source}")]
    Encode {
        /// Failing part
        part: Part,
        /// Underlying encode error
        #[source]
        source: EncodeError,
    },
}
impl CanonicalTextError {
    /// Returns the failing part, if the error is specific to one part
    pub fn part(&self) -> Option<Part> {
        match self {
            CanonicalTextError::PartCount(_) => None,
            CanonicalTextError::InvalidBase64 { part, .. }
            | CanonicalTextError::LengthMismatch { part, .. }
            | CanonicalTextError::InvalidRecord { part, .. }
            | CanonicalTextError::Encode { part, .. } => Some(*part),
        }
    }
}

/// Encodes a single record as base64 of its wire bytes
pub fn encode_record<T: WireEncode>(part: Part, record: &T) -> Result<String, CanonicalTextError> {
    let bytes = record
        .to_bytes()
        .map_err(|source| CanonicalTextError::Encode { part, source })?;
    Ok(BASE64_STANDARD.encode(bytes))
}

/// Decodes a single record from the base64 of its wire bytes
pub fn decode_record<T: WireDecode>(part: Part, text: &str) -> Result<T, CanonicalTextError> {
    let bytes = BASE64_STANDARD
        .decode(text)
        .map_err(|source| CanonicalTextError::InvalidBase64 { part, source })?;

    let expected = T::LAYOUT.size_bytes();
    if bytes.len() != expected {
        return Err(CanonicalTextError::LengthMismatch {
            part,
            expected,
            actual: bytes.len(),
        });
    }

    T::decode_exact(&bytes).map_err(|source| CanonicalTextError::InvalidRecord { part, source })
}

/// Encodes a key/value pair as `<base64(key)>,<base64(value)>`
pub fn encode_pair<K, V>(key: &K, value: &V) -> Result<String, CanonicalTextError>
where
    K: WireEncode,
    V: WireEncode,
{
    let key = encode_record(Part::Key, key)?;
    let value = encode_record(Part::Value, value)?;
    Ok(format!("{key}{DELIMITER}{value}"))
}

/// Decodes a key/value pair written by [`encode_pair`]
pub fn decode_pair<K, V>(text: &str) -> Result<(K, V), CanonicalTextError>
where
    K: WireDecode,
    V: WireDecode,
{
    let parts: Vec<&str> = text.split(DELIMITER).collect();
    let [key, value] = parts.as_slice() else {
        return Err(CanonicalTextError::PartCount(parts.len()));
    };

    Ok((
        decode_record(Part::Key, key)?,
        decode_record(Part::Value, value)?,
    ))
}
