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

//! Owned socket diagnostics records
//!
//! The address family is read before anything else. It selects the shape of the socket
//! identifier, so a message of an unknown family is rejected with
//! [`DecodeError::UnsupportedFamily`] without interpreting the address region.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use crate::{
    core::{
        buffer::DiagBuffer,
        decode::WireDecode,
        encode::{InvalidStructureError, WireEncode},
        layout::{DecodeError, StructLayout},
        view::View,
        write::{unchecked_array_write, unchecked_slot_write},
    },
    inet_diag::{
        layout::{InetDiagMsgLayout, InetDiagSockIdLayout},
        types::{AddressFamily, TcpState},
        view::{InetDiagMsgView, InetDiagSockIdView},
    },
    netlink::{
        layout::{NlMsgHdrLayout, nlmsg_align},
        model::{NetlinkMessage, NlMsgHdr},
        types::{NetlinkFlags, NetlinkMessageType},
    },
};

/// Source and destination of a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SockAddrPair {
    /// `AF_INET` socket
    V4 {
        /// Local address
        src: SocketAddrV4,
        /// Remote address
        dst: SocketAddrV4,
    },
    /// `AF_INET6` socket
    V6 {
        /// Local address
        src: SocketAddrV6,
        /// Remote address
        dst: SocketAddrV6,
    },
}
impl SockAddrPair {
    /// Returns the address family of the pair
    pub fn family(&self) -> AddressFamily {
        match self {
            SockAddrPair::V4 { .. } => AddressFamily::Inet,
            SockAddrPair::V6 { .. } => AddressFamily::Inet6,
        }
    }

    /// Returns the local address
    pub fn src(&self) -> SocketAddr {
        match self {
            SockAddrPair::V4 { src, .. } => SocketAddr::V4(*src),
            SockAddrPair::V6 { src, .. } => SocketAddr::V6(*src),
        }
    }

    /// Returns the remote address
    pub fn dst(&self) -> SocketAddr {
        match self {
            SockAddrPair::V4 { dst, .. } => SocketAddr::V4(*dst),
            SockAddrPair::V6 { dst, .. } => SocketAddr::V6(*dst),
        }
    }
}

/// Socket identifier (`struct inet_diag_sockid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InetDiagSockId {
    /// Addresses and ports, the variant is selected by the address family
    pub addrs: SockAddrPair,
    /// Interface index the socket is bound to
    pub interface: u32,
    /// Kernel socket cookie
    pub cookie: u64,
}
impl InetDiagSockId {
    /// Creates a socket identifier from a view, interpreting the addresses as `family`
    pub fn from_view(view: &InetDiagSockIdView, family: AddressFamily) -> Self {
        let addrs = match family {
            AddressFamily::Inet => SockAddrPair::V4 {
                src: SocketAddrV4::new(Ipv4Addr::from(view.src_v4()), view.sport()),
                dst: SocketAddrV4::new(Ipv4Addr::from(view.dst_v4()), view.dport()),
            },
            AddressFamily::Inet6 => SockAddrPair::V6 {
                src: SocketAddrV6::new(Ipv6Addr::from(view.src()), view.sport(), 0, 0),
                dst: SocketAddrV6::new(Ipv6Addr::from(view.dst()), view.dport(), 0, 0),
            },
        };

        Self {
            addrs,
            interface: view.interface(),
            cookie: view.cookie(),
        }
    }

    /// Decodes the socket identifier variant selected by the raw `family` value.
    ///
    /// The family is checked before the buffer, an unknown family is reported as
    /// [`DecodeError::UnsupportedFamily`] even for short buffers.
    pub fn resolve(buf: &[u8], family: u8) -> Result<Self, DecodeError> {
        let family = AddressFamily::resolve("idiag_family", family)?;
        let (view, _rest) = InetDiagSockIdView::from_slice(buf)?;
        Ok(Self::from_view(view, family))
    }

    /// Returns the address family of the identifier
    pub fn family(&self) -> AddressFamily {
        self.addrs.family()
    }
}
impl WireEncode for InetDiagSockId {
    fn required_size(&self) -> usize {
        InetDiagSockIdLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if let SockAddrPair::V6 { src, dst } = &self.addrs {
            if src.flowinfo() != 0 || dst.flowinfo() != 0 {
                return Err(InvalidStructureError::Unrepresentable {
                    field: "flowinfo",
                    layout: "inet_diag_sockid",
                });
            }
            if src.scope_id() != 0 || dst.scope_id() != 0 {
                return Err(InvalidStructureError::Unrepresentable {
                    field: "scope_id",
                    layout: "inet_diag_sockid",
                });
            }
        }
        Ok(())
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        let (src, dst) = match &self.addrs {
            SockAddrPair::V4 { src, dst } => {
                let mut src_octets = [0u8; 16];
                let mut dst_octets = [0u8; 16];
                src_octets[..4].copy_from_slice(&src.ip().octets());
                dst_octets[..4].copy_from_slice(&dst.ip().octets());
                ((src_octets, src.port()), (dst_octets, dst.port()))
            }
            SockAddrPair::V6 { src, dst } => {
                ((src.ip().octets(), src.port()), (dst.ip().octets(), dst.port()))
            }
        };

        // SAFETY: caller guarantees the buffer holds the layout
        unsafe {
            unchecked_slot_write(buf, InetDiagSockIdLayout::SPORT, src.1);
            unchecked_slot_write(buf, InetDiagSockIdLayout::DPORT, dst.1);
            unchecked_array_write(buf, InetDiagSockIdLayout::SRC.range, &src.0);
            unchecked_array_write(buf, InetDiagSockIdLayout::DST.range, &dst.0);
            unchecked_slot_write(buf, InetDiagSockIdLayout::IF, self.interface);
            unchecked_slot_write(buf, InetDiagSockIdLayout::COOKIE, self.cookie);
        }
        InetDiagSockIdLayout::SIZE_BYTES
    }
}

/// Socket diagnostics record (`struct inet_diag_msg`)
///
/// The address family is not stored separately, it is implied by [`InetDiagSockId::addrs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InetDiagMsg {
    /// Socket state
    pub state: TcpState,
    /// Pending timer, `0` if none is pending
    pub timer: u8,
    /// Number of retransmits or keepalive probes
    pub retrans: u8,
    /// Socket identifier
    pub id: InetDiagSockId,
    /// Time until the timer expires, in milliseconds
    pub expires: u32,
    /// Bytes in the receive queue, or pending connections for listening sockets
    pub rqueue: u32,
    /// Bytes in the send queue, or the backlog for listening sockets
    pub wqueue: u32,
    /// Owning user id
    pub uid: u32,
    /// Inode of the socket
    pub inode: u32,
}
impl InetDiagMsg {
    /// Creates a message from a view.
    ///
    /// Fails if the family of the message has no known socket identifier layout.
    pub fn from_view(view: &InetDiagMsgView) -> Result<Self, DecodeError> {
        let family = AddressFamily::resolve("idiag_family", view.family())?;

        Ok(Self {
            state: view.state(),
            timer: view.timer(),
            retrans: view.retrans(),
            id: InetDiagSockId::from_view(view.id(), family),
            expires: view.expires(),
            rqueue: view.rqueue(),
            wqueue: view.wqueue(),
            uid: view.uid(),
            inode: view.inode(),
        })
    }

    /// Returns the address family of the socket
    pub fn family(&self) -> AddressFamily {
        self.id.family()
    }
}
impl WireDecode for InetDiagMsg {
    const LAYOUT: &'static StructLayout = &InetDiagMsgLayout::LAYOUT;

    unsafe fn decode_unchecked(buf: &[u8]) -> Result<Self, DecodeError> {
        // SAFETY: caller guarantees the buffer holds the layout
        let view = unsafe { InetDiagMsgView::from_slice_unchecked(buf) };
        Self::from_view(view)
    }
}
impl WireEncode for InetDiagMsg {
    fn required_size(&self) -> usize {
        InetDiagMsgLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if !self.state.is_canonical() {
            return Err(InvalidStructureError::NonCanonicalVariant {
                field: "idiag_state",
                raw: u8::from(self.state).into(),
            });
        }
        self.id.wire_valid()
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        // SAFETY: caller guarantees the buffer holds the layout, which contains the id
        unsafe {
            unchecked_slot_write(buf, InetDiagMsgLayout::FAMILY, self.family().raw());
            unchecked_slot_write(buf, InetDiagMsgLayout::STATE, u8::from(self.state));
            unchecked_slot_write(buf, InetDiagMsgLayout::TIMER, self.timer);
            unchecked_slot_write(buf, InetDiagMsgLayout::RETRANS, self.retrans);
            self.id.encode_unchecked(
                buf.get_unchecked_mut(InetDiagMsgLayout::ID.range.range()),
            );
            unchecked_slot_write(buf, InetDiagMsgLayout::EXPIRES, self.expires);
            unchecked_slot_write(buf, InetDiagMsgLayout::RQUEUE, self.rqueue);
            unchecked_slot_write(buf, InetDiagMsgLayout::WQUEUE, self.wqueue);
            unchecked_slot_write(buf, InetDiagMsgLayout::UID, self.uid);
            unchecked_slot_write(buf, InetDiagMsgLayout::INODE, self.inode);
        }
        InetDiagMsgLayout::SIZE_BYTES
    }
}

/// A socket diagnostics response: a netlink header followed by an [`InetDiagMsg`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InetDiagMessage {
    /// Netlink header
    pub header: NlMsgHdr,
    /// Socket record
    pub msg: InetDiagMsg,
}
impl InetDiagMessage {
    /// Size of a message without attributes
    pub const SIZE_BYTES: usize = NlMsgHdrLayout::SIZE_BYTES + InetDiagMsgLayout::SIZE_BYTES;

    /// Creates a `SOCK_DIAG_BY_FAMILY` message without attributes
    pub fn new(msg: InetDiagMsg, flags: NetlinkFlags, seq: u32, pid: u32) -> Self {
        Self {
            header: NlMsgHdr {
                len: Self::SIZE_BYTES as u32,
                msg_type: NetlinkMessageType::SockDiagByFamily,
                flags,
                seq,
                pid,
            },
            msg,
        }
    }

    /// Parses the message at the cursor of `buffer`.
    ///
    /// The record is read at a fixed offset from the start of the message. Attributes following
    /// the record are skipped.
    ///
    /// Once the header advertises a complete message, the cursor is moved to the start of the next
    /// message, even if the record fails to decode. A caller can therefore skip a message of an
    /// unsupported address family and keep parsing. If the header itself is missing, too short or
    /// points past the end of the buffer, the cursor is left untouched.
    pub fn parse(buffer: &mut DiagBuffer<'_>) -> Result<Self, DecodeError> {
        let start = buffer.position();
        let mut cursor = *buffer;

        let header: NlMsgHdr = cursor.read()?;
        let advertised = header.len as usize;
        if advertised < Self::SIZE_BYTES {
            return Err(DecodeError::InvalidLength {
                at: "nlmsg_len",
                advertised,
                actual: Self::SIZE_BYTES,
            });
        }
        if buffer.remaining_from(start) < advertised {
            return Err(DecodeError::BufferTooSmall {
                at: "inet_diag message",
                required: advertised,
                actual: buffer.remaining_from(start),
            });
        }

        // The message is complete, so a record of an unknown family can be skipped
        let next = (start + nlmsg_align(advertised)).min(buffer.len());
        let msg = cursor.read_at::<InetDiagMsg>(start + NlMsgHdrLayout::SIZE_BYTES);
        buffer.set_position(next)?;

        Ok(Self { header, msg: msg? })
    }

    /// Decodes the record carried by a netlink message.
    pub fn from_netlink(message: &NetlinkMessage<'_>) -> Result<Self, DecodeError> {
        let (msg, _attributes) = InetDiagMsg::decode(message.payload)?;
        Ok(Self {
            header: message.header,
            msg,
        })
    }
}
impl WireEncode for InetDiagMessage {
    fn required_size(&self) -> usize {
        Self::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if self.header.len as usize != Self::SIZE_BYTES {
            return Err(InvalidStructureError::LengthMismatch {
                field: "nlmsg_len",
                expected: Self::SIZE_BYTES,
                actual: self.header.len as usize,
            });
        }
        self.header.wire_valid()?;
        self.msg.wire_valid()
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        // SAFETY: caller guarantees the buffer holds header and record
        unsafe {
            self.header.encode_unchecked(buf);
            self.msg
                .encode_unchecked(buf.get_unchecked_mut(NlMsgHdrLayout::SIZE_BYTES..));
        }
        Self::SIZE_BYTES
    }
}
