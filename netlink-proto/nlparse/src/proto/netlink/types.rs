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

//! Netlink header field types

use std::fmt;

bitflags::bitflags! {
    /// Netlink message flags (`NLM_F_*`)
    ///
    /// Bits `0x100` and up are modifiers whose meaning depends on the request kind, only the
    /// GET modifiers used for dumps are named here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NetlinkFlags: u16 {
        /// Message is a request
        const REQUEST = 0x01;
        /// Part of a multipart message, terminated by `NLMSG_DONE`
        const MULTI = 0x02;
        /// Reply with an acknowledgement
        const ACK = 0x04;
        /// Echo this request
        const ECHO = 0x08;
        /// Dump was inconsistent due to a sequence change
        const DUMP_INTR = 0x10;
        /// Dump was filtered as requested
        const DUMP_FILTERED = 0x20;

        /// Return the complete table
        const ROOT = 0x100;
        /// Return all matching entries
        const MATCH = 0x200;
        /// Return an atomic snapshot of the table
        const ATOMIC = 0x400;
        /// Dump request, `ROOT | MATCH`
        const DUMP = Self::ROOT.bits() | Self::MATCH.bits();

        const _ = !0;
    }
}

/// Netlink message type (`nlmsg_type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetlinkMessageType {
    /// `NLMSG_NOOP`, to be ignored
    Noop,
    /// `NLMSG_ERROR`, followed by `struct nlmsgerr`
    Error,
    /// `NLMSG_DONE`, end of a multipart message
    Done,
    /// `NLMSG_OVERRUN`, data was lost
    Overrun,
    /// `SOCK_DIAG_BY_FAMILY`, request or response of the socket diagnostics family
    SockDiagByFamily,
    /// Any other type
    Other(u16),
}
impl NetlinkMessageType {
    /// Returns true for the control types defined by netlink itself
    pub const fn is_control(&self) -> bool {
        matches!(
            self,
            Self::Noop | Self::Error | Self::Done | Self::Overrun
        )
    }
}
impl NetlinkMessageType {
    /// Returns false for an \`Other\` variant holding the raw value of a named type
    pub fn is_canonical(&self) -> bool {
        Self::from(u16::from(*self)) == *self
    }
}
impl From<u16> for NetlinkMessageType {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::Noop,
            2 => Self::Error,
            3 => Self::Done,
            4 => Self::Overrun,
            20 => Self::SockDiagByFamily,
            other => Self::Other(other),
        }
    }
}
impl From<NetlinkMessageType> for u16 {
    fn from(value: NetlinkMessageType) -> Self {
        match value {
            NetlinkMessageType::Noop => 1,
            NetlinkMessageType::Error => 2,
            NetlinkMessageType::Done => 3,
            NetlinkMessageType::Overrun => 4,
            NetlinkMessageType::SockDiagByFamily => 20,
            NetlinkMessageType::Other(other) => other,
        }
    }
}
impl fmt::Display for NetlinkMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noop => write!(f, "NLMSG_NOOP"),
            Self::Error => write!(f, "NLMSG_ERROR"),
            Self::Done => write!(f, "NLMSG_DONE"),
            Self::Overrun => write!(f, "NLMSG_OVERRUN"),
            Self::SockDiagByFamily => write!(f, "SOCK_DIAG_BY_FAMILY"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_known_types() {
        for raw in 0..=32u16 {
            let ty = NetlinkMessageType::from(raw);
            assert_eq!(u16::from(ty), raw);
        }
        assert_eq!(NetlinkMessageType::from(3), NetlinkMessageType::Done);
        assert_eq!(NetlinkMessageType::from(20), NetlinkMessageType::SockDiagByFamily);
        assert!(NetlinkMessageType::Error.is_control());
        assert!(!NetlinkMessageType::Other(16).is_control());
        assert!(NetlinkMessageType::Other(16).is_canonical());
        assert!(NetlinkMessageType::Done.is_canonical());
        assert!(!NetlinkMessageType::Other(3).is_canonical());
    }

    #[test]
    fn should_keep_unknown_flag_bits() {
        let flags = NetlinkFlags::from_bits_retain(0x8002);
        assert!(flags.contains(NetlinkFlags::MULTI));
        assert_eq!(flags.bits(), 0x8002);
        assert_eq!(NetlinkFlags::DUMP.bits(), 0x300);
    }
}
