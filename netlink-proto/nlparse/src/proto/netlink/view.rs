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

use crate::{
    core::view::macros::{gen_field_read, impl_fixed_view},
    netlink::{
        layout::NlMsgHdrLayout,
        types::{NetlinkFlags, NetlinkMessageType},
    },
};

/// View over a netlink message header
#[repr(transparent)]
pub struct NlMsgHdrView([u8]);
impl_fixed_view!(NlMsgHdrView, NlMsgHdrLayout::LAYOUT);
impl NlMsgHdrView {
    gen_field_read!(len, NlMsgHdrLayout::LEN, u32);
    gen_field_read!(msg_type_raw, NlMsgHdrLayout::TYPE, u16);
    gen_field_read!(flags_raw, NlMsgHdrLayout::FLAGS, u16);
    gen_field_read!(seq, NlMsgHdrLayout::SEQ, u32);
    gen_field_read!(pid, NlMsgHdrLayout::PID, u32);

    /// Returns the message type
    #[inline]
    pub fn msg_type(&self) -> NetlinkMessageType {
        self.msg_type_raw().into()
    }

    /// Returns the message flags, including unknown bits
    #[inline]
    pub fn flags(&self) -> NetlinkFlags {
        NetlinkFlags::from_bits_retain(self.flags_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{layout::DecodeError, view::View};

    #[test]
    fn should_read_header_fields() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&88u32.to_ne_bytes());
        buf.extend_from_slice(&20u16.to_ne_bytes());
        buf.extend_from_slice(&0x0002u16.to_ne_bytes());
        buf.extend_from_slice(&123_456u32.to_ne_bytes());
        buf.extend_from_slice(&4242u32.to_ne_bytes());
        buf.push(0xAA);

        let (view, rest) = NlMsgHdrView::from_slice(&buf).expect("valid header");
        assert_eq!(view.len(), 88);
        assert_eq!(view.msg_type(), NetlinkMessageType::SockDiagByFamily);
        assert_eq!(view.flags(), NetlinkFlags::MULTI);
        assert_eq!(view.seq(), 123_456);
        assert_eq!(view.pid(), 4242);
        assert_eq!(rest, &[0xAA]);
        assert_eq!(view.as_bytes().len(), 16);
    }

    #[test]
    fn should_reject_short_header() {
        assert_eq!(
            NlMsgHdrView::from_slice(&[0u8; 15]).err(),
            Some(DecodeError::BufferTooSmall {
                at: "nlmsghdr",
                required: 16,
                actual: 15
            })
        );
    }
}
