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

//! Socket diagnostics field types

use std::fmt;

use crate::core::layout::DecodeError;

/// Address families with a known socket identifier layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// `AF_INET`
    Inet,
    /// `AF_INET6`
    Inet6,
}
impl AddressFamily {
    /// Raw value of `AF_INET`
    pub const AF_INET: u8 = 2;
    /// Raw value of `AF_INET6`
    pub const AF_INET6: u8 = 10;

    /// Maps a raw family value, returns None for families without a known layout
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            Self::AF_INET => Some(Self::Inet),
            Self::AF_INET6 => Some(Self::Inet6),
            _ => None,
        }
    }

    /// Returns the raw family value
    pub const fn raw(&self) -> u8 {
        match self {
            Self::Inet => Self::AF_INET,
            Self::Inet6 => Self::AF_INET6,
        }
    }

    /// Like [`AddressFamily::from_raw`], reporting unknown families as [`DecodeError`]
    pub fn resolve(at: &'static str, raw: u8) -> Result<Self, DecodeError> {
        Self::from_raw(raw).ok_or_else(|| {
            tracing::debug!(at, family = raw, "Unsupported address family");
            DecodeError::UnsupportedFamily { at, family: raw }
        })
    }
}
impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inet => write!(f, "AF_INET"),
            Self::Inet6 => write!(f, "AF_INET6"),
        }
    }
}

/// TCP socket state (`idiag_state`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TcpState {
    /// `TCP_ESTABLISHED`
    Established,
    /// `TCP_SYN_SENT`
    SynSent,
    /// `TCP_SYN_RECV`
    SynRecv,
    /// `TCP_FIN_WAIT1`
    FinWait1,
    /// `TCP_FIN_WAIT2`
    FinWait2,
    /// `TCP_TIME_WAIT`
    TimeWait,
    /// `TCP_CLOSE`
    Close,
    /// `TCP_CLOSE_WAIT`
    CloseWait,
    /// `TCP_LAST_ACK`
    LastAck,
    /// `TCP_LISTEN`
    Listen,
    /// `TCP_CLOSING`
    Closing,
    /// `TCP_NEW_SYN_RECV`
    NewSynRecv,
    /// Any other state, e.g. of a non-TCP socket
    Other(u8),
}
impl TcpState {
    /// Returns false for an \`Other\` variant holding the raw value of a named state
    pub fn is_canonical(&self) -> bool {
        Self::from(u8::from(*self)) == *self
    }
}
impl From<u8> for TcpState {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Established,
            2 => Self::SynSent,
            3 => Self::SynRecv,
            4 => Self::FinWait1,
            5 => Self::FinWait2,
            6 => Self::TimeWait,
            7 => Self::Close,
            8 => Self::CloseWait,
            9 => Self::LastAck,
            10 => Self::Listen,
            11 => Self::Closing,
            12 => Self::NewSynRecv,
            other => Self::Other(other),
        }
    }
}
impl From<TcpState> for u8 {
    fn from(value: TcpState) -> Self {
        match value {
            TcpState::Established => 1,
            TcpState::SynSent => 2,
            TcpState::SynRecv => 3,
            TcpState::FinWait1 => 4,
            TcpState::FinWait2 => 5,
            TcpState::TimeWait => 6,
            TcpState::Close => 7,
            TcpState::CloseWait => 8,
            TcpState::LastAck => 9,
            TcpState::Listen => 10,
            TcpState::Closing => 11,
            TcpState::NewSynRecv => 12,
            TcpState::Other(other) => other,
        }
    }
}
