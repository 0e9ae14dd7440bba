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
    core::view::{
        View,
        macros::{gen_array_read, gen_field_read, impl_fixed_view},
    },
    inet_diag::{
        layout::{InetDiagMsgLayout, InetDiagSockIdLayout},
        types::TcpState,
    },
};

/// View over a socket identifier
///
/// Address readers do not know the family, the caller selects `src` or `src_v4` from the
/// family field of the enclosing message.
#[repr(transparent)]
pub struct InetDiagSockIdView([u8]);
impl_fixed_view!(InetDiagSockIdView, InetDiagSockIdLayout::LAYOUT);
impl InetDiagSockIdView {
    gen_field_read!(sport, InetDiagSockIdLayout::SPORT, u16);
    gen_field_read!(dport, InetDiagSockIdLayout::DPORT, u16);
    gen_array_read!(src, InetDiagSockIdLayout::SRC, 16);
    gen_array_read!(dst, InetDiagSockIdLayout::DST, 16);
    gen_array_read!(src_v4, InetDiagSockIdLayout::SRC_V4, 4);
    gen_array_read!(dst_v4, InetDiagSockIdLayout::DST_V4, 4);
    gen_field_read!(interface, InetDiagSockIdLayout::IF, u32);
    gen_field_read!(cookie, InetDiagSockIdLayout::COOKIE, u64);
}

/// View over a socket diagnostics message
#[repr(transparent)]
pub struct InetDiagMsgView([u8]);
impl_fixed_view!(InetDiagMsgView, InetDiagMsgLayout::LAYOUT);
impl InetDiagMsgView {
    gen_field_read!(family, InetDiagMsgLayout::FAMILY, u8);
    gen_field_read!(state_raw, InetDiagMsgLayout::STATE, u8);
    gen_field_read!(timer, InetDiagMsgLayout::TIMER, u8);
    gen_field_read!(retrans, InetDiagMsgLayout::RETRANS, u8);
    gen_field_read!(expires, InetDiagMsgLayout::EXPIRES, u32);
    gen_field_read!(rqueue, InetDiagMsgLayout::RQUEUE, u32);
    gen_field_read!(wqueue, InetDiagMsgLayout::WQUEUE, u32);
    gen_field_read!(uid, InetDiagMsgLayout::UID, u32);
    gen_field_read!(inode, InetDiagMsgLayout::INODE, u32);

    /// Returns the socket state
    #[inline]
    pub fn state(&self) -> TcpState {
        self.state_raw().into()
    }

    /// Returns a view over the embedded socket identifier
    #[inline]
    pub fn id(&self) -> &InetDiagSockIdView {
        // SAFETY: buffer size is checked on construction and the id lies within the message
        unsafe {
            InetDiagSockIdView::from_slice_unchecked(
                self.0.get_unchecked(InetDiagMsgLayout::ID.range.range()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> [u8; 72] {
        let mut buf = [0u8; 72];
        buf[0] = 2;
        buf[1] = 10;
        buf[4..6].copy_from_slice(&8080u16.to_be_bytes());
        buf[6..8].copy_from_slice(&443u16.to_be_bytes());
        buf[8..12].copy_from_slice(&[127, 0, 0, 1]);
        buf[24..28].copy_from_slice(&[10, 0, 0, 2]);
        buf[40..44].copy_from_slice(&3u32.to_ne_bytes());
        buf[44..52].copy_from_slice(&0xDEAD_BEEFu64.to_ne_bytes());
        buf[64..68].copy_from_slice(&1000u32.to_ne_bytes());
        buf[68..72].copy_from_slice(&55u32.to_ne_bytes());
        buf
    }

    #[test]
    fn should_read_message_fields() {
        let buf = sample();
        let (view, rest) = InetDiagMsgView::from_slice(&buf).expect("valid message");
        assert!(rest.is_empty());
        assert_eq!(view.family(), 2);
        assert_eq!(view.state(), TcpState::Listen);
        assert_eq!(view.uid(), 1000);
        assert_eq!(view.inode(), 55);
    }

    #[test]
    fn should_read_embedded_socket_id() {
        let buf = sample();
        let (view, _) = InetDiagMsgView::from_slice(&buf).expect("valid message");
        let id = view.id();
        assert_eq!(id.as_bytes().len(), 48);
        assert_eq!(id.sport(), 8080);
        assert_eq!(id.dport(), 443);
        assert_eq!(id.src_v4(), [127, 0, 0, 1]);
        assert_eq!(id.dst_v4(), [10, 0, 0, 2]);
        assert_eq!(&id.src()[..4], &[127, 0, 0, 1]);
        assert_eq!(id.interface(), 3);
        assert_eq!(id.cookie(), 0xDEAD_BEEF);
    }

    #[test]
    fn should_reject_short_message() {
        assert!(InetDiagMsgView::from_slice(&[2u8; 71]).is_err());
    }
}
