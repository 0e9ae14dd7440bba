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

//! Layout of the netlink message header

use crate::core::layout::{ByteOrder, Field, StructLayout, macros::gen_slot_const};

/// Netlink messages are aligned to four bytes
pub const NLMSG_ALIGNTO: usize = 4;

/// Rounds `len` up to the netlink message alignment
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Layout of `struct nlmsghdr`
///
/// All fields are in host byte order.
pub struct NlMsgHdrLayout;
impl NlMsgHdrLayout {
    // struct nlmsghdr {
    //     __u32 nlmsg_len;
    //     __u16 nlmsg_type;
    //     __u16 nlmsg_flags;
    //     __u32 nlmsg_seq;
    //     __u32 nlmsg_pid;
    // };
    /// Field list of the header
    pub const LAYOUT: StructLayout = StructLayout::new(
        "nlmsghdr",
        &[
            Field::u32("nlmsg_len", ByteOrder::NATIVE),
            Field::u16("nlmsg_type", ByteOrder::NATIVE),
            Field::u16("nlmsg_flags", ByteOrder::NATIVE),
            Field::u32("nlmsg_seq", ByteOrder::NATIVE),
            Field::u32("nlmsg_pid", ByteOrder::NATIVE),
        ],
    );

    gen_slot_const!(LEN, Self::LAYOUT, "nlmsg_len");
    gen_slot_const!(TYPE, Self::LAYOUT, "nlmsg_type");
    gen_slot_const!(FLAGS, Self::LAYOUT, "nlmsg_flags");
    gen_slot_const!(SEQ, Self::LAYOUT, "nlmsg_seq");
    gen_slot_const!(PID, Self::LAYOUT, "nlmsg_pid");

    /// Size of the header in bytes
    pub const SIZE_BYTES: usize = Self::LAYOUT.size_bytes();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_match_kernel_header() {
        assert_eq!(NlMsgHdrLayout::SIZE_BYTES, 16);
        assert_eq!(NlMsgHdrLayout::TYPE.range.start, 4);
        assert_eq!(NlMsgHdrLayout::FLAGS.range.start, 6);
        assert_eq!(NlMsgHdrLayout::PID.range.range(), 12..16);
    }

    #[test]
    fn should_align_lengths() {
        assert_eq!(nlmsg_align(0), 0);
        assert_eq!(nlmsg_align(1), 4);
        assert_eq!(nlmsg_align(20), 20);
        assert_eq!(nlmsg_align(21), 24);
    }
}
