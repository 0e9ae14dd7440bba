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

//! Layouts of the socket diagnostics structures
//!
//! `struct inet_diag_sockid` always occupies 48 bytes. For `AF_INET` only the first four bytes
//! of each address slot are used, the remaining twelve are zero.

use crate::{
    core::layout::{ByteOrder, Field, StructLayout, macros::gen_slot_const},
    inet_diag::types::AddressFamily,
};

/// Layout of `struct inet_diag_sockid`
pub struct InetDiagSockIdLayout;
impl InetDiagSockIdLayout {
    // struct inet_diag_sockid {
    //     __be16  idiag_sport;
    //     __be16  idiag_dport;
    //     __be32  idiag_src[4];
    //     __be32  idiag_dst[4];
    //     __u32   idiag_if;
    //     __u32   idiag_cookie[2];
    // };
    /// Family independent field list
    pub const LAYOUT: StructLayout = StructLayout::new(
        "inet_diag_sockid",
        &[
            Field::u16("idiag_sport", ByteOrder::NETWORK),
            Field::u16("idiag_dport", ByteOrder::NETWORK),
            Field::bytes("idiag_src", 16),
            Field::bytes("idiag_dst", 16),
            Field::u32("idiag_if", ByteOrder::NATIVE),
            Field::u64("idiag_cookie", ByteOrder::NATIVE),
        ],
    );

    /// Field list for `AF_INET` sockets
    pub const INET_LAYOUT: StructLayout = StructLayout::new(
        "inet_diag_sockid (AF_INET)",
        &[
            Field::u16("idiag_sport", ByteOrder::NETWORK),
            Field::u16("idiag_dport", ByteOrder::NETWORK),
            Field::bytes("idiag_src", 4),
            Field::bytes("idiag_src_pad", 12),
            Field::bytes("idiag_dst", 4),
            Field::bytes("idiag_dst_pad", 12),
            Field::u32("idiag_if", ByteOrder::NATIVE),
            Field::u64("idiag_cookie", ByteOrder::NATIVE),
        ],
    );

    /// Field list for `AF_INET6` sockets
    pub const INET6_LAYOUT: StructLayout = StructLayout::new(
        "inet_diag_sockid (AF_INET6)",
        Self::LAYOUT.fields,
    );

    gen_slot_const!(SPORT, Self::LAYOUT, "idiag_sport");
    gen_slot_const!(DPORT, Self::LAYOUT, "idiag_dport");
    gen_slot_const!(SRC, Self::LAYOUT, "idiag_src");
    gen_slot_const!(DST, Self::LAYOUT, "idiag_dst");
    gen_slot_const!(IF, Self::LAYOUT, "idiag_if");
    gen_slot_const!(COOKIE, Self::LAYOUT, "idiag_cookie");

    gen_slot_const!(SRC_V4, Self::INET_LAYOUT, "idiag_src");
    gen_slot_const!(DST_V4, Self::INET_LAYOUT, "idiag_dst");

    /// Size of the structure in bytes, independent of the family
    pub const SIZE_BYTES: usize = Self::LAYOUT.size_bytes();

    /// Returns the field list used by `family`
    pub const fn for_family(family: AddressFamily) -> &'static StructLayout {
        match family {
            AddressFamily::Inet => &Self::INET_LAYOUT,
            AddressFamily::Inet6 => &Self::INET6_LAYOUT,
        }
    }
}

/// Layout of `struct inet_diag_msg`
pub struct InetDiagMsgLayout;
impl InetDiagMsgLayout {
    // struct inet_diag_msg {
    //     __u8    idiag_family;
    //     __u8    idiag_state;
    //     __u8    idiag_timer;
    //     __u8    idiag_retrans;
    //     struct inet_diag_sockid id;
    //     __u32   idiag_expires;
    //     __u32   idiag_rqueue;
    //     __u32   idiag_wqueue;
    //     __u32   idiag_uid;
    //     __u32   idiag_inode;
    // };
    /// Field list of the message
    pub const LAYOUT: StructLayout = StructLayout::new(
        "inet_diag_msg",
        &[
            Field::u8("idiag_family"),
            Field::u8("idiag_state"),
            Field::u8("idiag_timer"),
            Field::u8("idiag_retrans"),
            Field::nested("id", &InetDiagSockIdLayout::LAYOUT),
            Field::u32("idiag_expires", ByteOrder::NATIVE),
            Field::u32("idiag_rqueue", ByteOrder::NATIVE),
            Field::u32("idiag_wqueue", ByteOrder::NATIVE),
            Field::u32("idiag_uid", ByteOrder::NATIVE),
            Field::u32("idiag_inode", ByteOrder::NATIVE),
        ],
    );

    gen_slot_const!(FAMILY, Self::LAYOUT, "idiag_family");
    gen_slot_const!(STATE, Self::LAYOUT, "idiag_state");
    gen_slot_const!(TIMER, Self::LAYOUT, "idiag_timer");
    gen_slot_const!(RETRANS, Self::LAYOUT, "idiag_retrans");
    gen_slot_const!(ID, Self::LAYOUT, "id");
    gen_slot_const!(EXPIRES, Self::LAYOUT, "idiag_expires");
    gen_slot_const!(RQUEUE, Self::LAYOUT, "idiag_rqueue");
    gen_slot_const!(WQUEUE, Self::LAYOUT, "idiag_wqueue");
    gen_slot_const!(UID, Self::LAYOUT, "idiag_uid");
    gen_slot_const!(INODE, Self::LAYOUT, "idiag_inode");

    /// Size of the message in bytes
    pub const SIZE_BYTES: usize = Self::LAYOUT.size_bytes();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_kernel_sizes() {
        assert_eq!(InetDiagSockIdLayout::SIZE_BYTES, 48);
        assert_eq!(InetDiagMsgLayout::SIZE_BYTES, 72);
    }

    #[test]
    fn should_use_same_size_for_every_family() {
        for family in [AddressFamily::Inet, AddressFamily::Inet6] {
            assert_eq!(
                InetDiagSockIdLayout::for_family(family).size_bytes(),
                InetDiagSockIdLayout::SIZE_BYTES
            );
        }
    }

    #[test]
    fn should_place_fields_at_kernel_offsets() {
        assert_eq!(InetDiagMsgLayout::ID.range.range(), 4..52);
        assert_eq!(InetDiagMsgLayout::UID.range.start, 4 + 48 + 12);
        assert_eq!(InetDiagMsgLayout::INODE.range.end, 72);

        assert_eq!(InetDiagSockIdLayout::SRC.range.range(), 4..20);
        assert_eq!(InetDiagSockIdLayout::SRC_V4.range.range(), 4..8);
        assert_eq!(InetDiagSockIdLayout::DST_V4.range.start, InetDiagSockIdLayout::DST.range.start);
        assert_eq!(InetDiagSockIdLayout::COOKIE.range.range(), 40..48);
    }
}
