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

//! Contains tests for socket diagnostics message decoding and encoding
//!
//! 1. All valid messages should roundtrip through encode/decode without loss of information
//! 2. Every buffer shorter than a record must be reported as insufficient, at every offset
//! 3. Brute force fuzzing must not panic while walking or parsing netlink buffers
//! 4. Messages of unknown address families fail on their own, without affecting the rest of a
//!    dump

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

use nlparse::{
    core::{
        buffer::DiagBuffer,
        debug::FieldDump,
        decode::WireDecode,
        encode::WireEncode,
        layout::DecodeError,
    },
    inet_diag::{
        layout::InetDiagMsgLayout,
        model::{InetDiagMessage, InetDiagMsg, InetDiagSockId, SockAddrPair},
        types::{AddressFamily, TcpState},
    },
    netlink::{
        layout::NlMsgHdrLayout,
        model::{NetlinkMessages, NlMsgHdr},
        types::{NetlinkFlags, NetlinkMessageType},
    },
};
use proptest::{
    collection::vec,
    prelude::{ProptestConfig, any},
    prop_assert, prop_assert_eq, proptest,
};
use proptest_derive::Arbitrary;
use test_log::test;

/// Options for constructing a valid socket diagnostics message for testing
#[derive(Debug, Clone, Arbitrary)]
struct ValidMessageOptions {
    v6: bool,
    src: [u8; 16],
    dst: [u8; 16],
    sport: u16,
    dport: u16,
    state: u8,
    timer: u8,
    retrans: u8,
    interface: u32,
    cookie: u64,
    expires: u32,
    rqueue: u32,
    wqueue: u32,
    uid: u32,
    inode: u32,
    flags: u16,
    seq: u32,
    pid: u32,
}
impl ValidMessageOptions {
    fn to_msg(&self) -> InetDiagMsg {
        let addrs = if self.v6 {
            SockAddrPair::V6 {
                src: SocketAddrV6::new(Ipv6Addr::from(self.src), self.sport, 0, 0),
                dst: SocketAddrV6::new(Ipv6Addr::from(self.dst), self.dport, 0, 0),
            }
        } else {
            let src: [u8; 4] = [self.src[0], self.src[1], self.src[2], self.src[3]];
            let dst: [u8; 4] = [self.dst[0], self.dst[1], self.dst[2], self.dst[3]];
            SockAddrPair::V4 {
                src: SocketAddrV4::new(Ipv4Addr::from(src), self.sport),
                dst: SocketAddrV4::new(Ipv4Addr::from(dst), self.dport),
            }
        };

        InetDiagMsg {
            state: TcpState::from(self.state),
            timer: self.timer,
            retrans: self.retrans,
            id: InetDiagSockId {
                addrs,
                interface: self.interface,
                cookie: self.cookie,
            },
            expires: self.expires,
            rqueue: self.rqueue,
            wqueue: self.wqueue,
            uid: self.uid,
            inode: self.inode,
        }
    }

    fn to_message(&self) -> InetDiagMessage {
        InetDiagMessage::new(
            self.to_msg(),
            NetlinkFlags::from_bits_retain(self.flags),
            self.seq,
            self.pid,
        )
    }
}

fn sample_msg(family: AddressFamily) -> InetDiagMsg {
    let addrs = match family {
        AddressFamily::Inet => SockAddrPair::V4 {
            src: "192.0.2.1:8080".parse().expect("valid address"),
            dst: "198.51.100.7:40000".parse().expect("valid address"),
        },
        AddressFamily::Inet6 => SockAddrPair::V6 {
            src: "[2001:db8::1]:443".parse().expect("valid address"),
            dst: "[2001:db8::2]:51000".parse().expect("valid address"),
        },
    };
    InetDiagMsg {
        state: TcpState::Established,
        timer: 0,
        retrans: 0,
        id: InetDiagSockId {
            addrs,
            interface: 2,
            cookie: 77,
        },
        expires: 0,
        rqueue: 0,
        wqueue: 0,
        uid: 1000,
        inode: 31337,
    }
}

#[test]
fn valid_messages_should_roundtrip_correctly() {
    proptest!(
        ProptestConfig::with_cases(2_000),
        |(opts: ValidMessageOptions)| {
            let initial = opts.to_message();
            prop_assert!(initial.wire_valid().is_ok());

            let bytes = initial.to_bytes().expect("Encoding message failed");
            prop_assert_eq!(bytes.len(), InetDiagMessage::SIZE_BYTES);

            let mut buffer = DiagBuffer::new(&bytes);
            let decoded = InetDiagMessage::parse(&mut buffer).expect("Parsing message failed");
            prop_assert_eq!(buffer.remaining(), 0);
            prop_assert_eq!(initial, decoded);

            let msg = InetDiagMsg::decode_exact(&bytes[NlMsgHdrLayout::SIZE_BYTES..])
                .expect("Decoding record failed");
            prop_assert_eq!(opts.to_msg(), msg);
            prop_assert_eq!(msg.family(), if opts.v6 { AddressFamily::Inet6 } else { AddressFamily::Inet });
        }
    );
}

#[test]
fn short_buffers_should_be_insufficient_at_every_offset() {
    let bytes = sample_msg(AddressFamily::Inet6)
        .to_bytes()
        .expect("valid message");
    let size = InetDiagMsgLayout::SIZE_BYTES;

    for len in 0..size {
        assert!(
            matches!(
                InetDiagMsg::decode(&bytes[..len]),
                Err(DecodeError::BufferTooSmall { required: 72, actual, .. }) if actual == len
            ),
            "decoding {len} bytes"
        );
    }

    let mut padded = vec![0u8; 8];
    padded.extend_from_slice(&bytes);
    for offset in 9..padded.len() {
        let mut buffer = DiagBuffer::new(&padded);
        let err = buffer
            .read_at::<InetDiagMsg>(offset)
            .expect_err("record does not fit");
        assert!(err.is_recoverable());
        assert_eq!(buffer.position(), 0);
    }

    let mut buffer = DiagBuffer::new(&padded);
    assert_eq!(buffer.read_at::<InetDiagMsg>(8), Ok(sample_msg(AddressFamily::Inet6)));
    assert_eq!(buffer.remaining(), 0);
}

#[test]
fn known_families_should_resolve_to_their_variant() {
    for family in [AddressFamily::Inet, AddressFamily::Inet6] {
        let bytes = sample_msg(family).to_bytes().expect("valid message");
        let id = InetDiagSockId::resolve(&bytes[4..52], family.raw()).expect("known family");
        assert_eq!(id.family(), family);
        assert_eq!(id, sample_msg(family).id);
    }

    let bytes = sample_msg(AddressFamily::Inet).to_bytes().expect("valid message");
    for raw in (0..=u8::MAX).filter(|raw| AddressFamily::from_raw(*raw).is_none()) {
        assert_eq!(
            InetDiagSockId::resolve(&bytes[4..52], raw),
            Err(DecodeError::UnsupportedFamily {
                at: "idiag_family",
                family: raw
            })
        );
    }
}

#[test]
fn unknown_family_should_only_fail_its_message() {
    let mut buf = Vec::new();
    let mut seq = 0;
    for family in [
        Some(AddressFamily::Inet),
        None,
        Some(AddressFamily::Inet6),
    ] {
        seq += 1;
        let msg = sample_msg(family.unwrap_or(AddressFamily::Inet));
        let mut bytes = InetDiagMessage::new(msg, NetlinkFlags::MULTI, seq, 0)
            .to_bytes()
            .expect("valid message");
        if family.is_none() {
            // AF_UNIX
            bytes[NlMsgHdrLayout::SIZE_BYTES] = 1;
        }
        buf.extend(bytes);
    }
    let done = NlMsgHdr {
        len: 20,
        msg_type: NetlinkMessageType::Done,
        flags: NetlinkFlags::MULTI,
        seq: 4,
        pid: 0,
    };
    buf.extend(done.to_bytes().expect("valid header"));
    buf.extend(0u32.to_ne_bytes());

    let results: Vec<_> = NetlinkMessages::new(&buf)
        .map(|message| InetDiagMessage::from_netlink(&message.expect("well formed netlink")))
        .collect();

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().map(|m| m.msg),
        Ok(sample_msg(AddressFamily::Inet))
    );
    assert_eq!(
        results[1],
        Err(DecodeError::UnsupportedFamily {
            at: "idiag_family",
            family: 1
        })
    );
    let last = results[2].as_ref().expect("IPv6 message");
    assert_eq!(last.header.seq, 3);
    assert_eq!(last.msg, sample_msg(AddressFamily::Inet6));
}

#[test]
fn parsing_arbitrary_bytes_must_not_panic() {
    proptest!(
        ProptestConfig::with_cases(5_000),
        |(bytes in vec(any::<u8>(), 0..256))| {
            for message in NetlinkMessages::new(&bytes).flatten() {
                let _ = InetDiagMessage::from_netlink(&message);
            }

            let mut buffer = DiagBuffer::new(&bytes);
            while InetDiagMessage::parse(&mut buffer).is_ok() {}

            if let Ok((msg, _rest)) = InetDiagMsg::decode(&bytes) {
                // Any decoded record must be encodable again
                prop_assert!(msg.to_bytes().is_ok());
            }
        }
    );
}

#[test]
fn field_dump_should_annotate_kernel_message() {
    let bytes = sample_msg(AddressFamily::Inet)
        .to_bytes()
        .expect("valid message");
    let dump = FieldDump::new(&InetDiagMsgLayout::LAYOUT, &bytes).to_string();

    assert!(dump.starts_with("inet_diag_msg (72 bytes, 72 available)\n"), "{dump}");
    let sport = dump
        .lines()
        .find(|line| line.contains("idiag_sport"))
        .expect("port line");
    assert!(sport.starts_with("0x0004") && sport.contains("1F90") && sport.ends_with("= 8080"));
    let src = dump
        .lines()
        .find(|line| line.contains("idiag_src"))
        .expect("address line");
    assert!(src.contains("C0000201000000000000000000000000"));

    let truncated = FieldDump::new(&InetDiagMsgLayout::LAYOUT, &bytes[..60]).to_string();
    assert!(truncated.lines().last().is_some_and(|line| line.ends_with("= n/a")));
}
