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

//! Owned netlink header and iteration over netlink receive buffers

use crate::{
    core::{
        buffer::DiagBuffer,
        decode::WireDecode,
        encode::{InvalidStructureError, WireEncode},
        layout::{DecodeError, StructLayout},
        view::View,
        write::unchecked_slot_write,
    },
    netlink::{
        layout::{NlMsgHdrLayout, nlmsg_align},
        types::{NetlinkFlags, NetlinkMessageType},
        view::NlMsgHdrView,
    },
};

/// Netlink message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NlMsgHdr {
    /// Length of the message including this header
    pub len: u32,
    /// Message type
    pub msg_type: NetlinkMessageType,
    /// Message flags
    pub flags: NetlinkFlags,
    /// Sequence number
    pub seq: u32,
    /// Port id of the sender
    pub pid: u32,
}
impl NlMsgHdr {
    /// Creates a header from a view
    pub fn from_view(view: &NlMsgHdrView) -> Self {
        Self {
            len: view.len(),
            msg_type: view.msg_type(),
            flags: view.flags(),
            seq: view.seq(),
            pid: view.pid(),
        }
    }

    /// Returns the number of payload bytes advertised by the header
    pub fn payload_len(&self) -> usize {
        (self.len as usize).saturating_sub(NlMsgHdrLayout::SIZE_BYTES)
    }
}
impl WireDecode for NlMsgHdr {
    const LAYOUT: &'static StructLayout = &NlMsgHdrLayout::LAYOUT;

    unsafe fn decode_unchecked(buf: &[u8]) -> Result<Self, DecodeError> {
        // SAFETY: caller guarantees the buffer holds the layout
        let view = unsafe { NlMsgHdrView::from_slice_unchecked(buf) };
        Ok(Self::from_view(view))
    }
}
impl WireEncode for NlMsgHdr {
    fn required_size(&self) -> usize {
        NlMsgHdrLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if (self.len as usize) < NlMsgHdrLayout::SIZE_BYTES {
            return Err(InvalidStructureError::LengthTooSmall {
                field: "nlmsg_len",
                minimum: NlMsgHdrLayout::SIZE_BYTES,
                actual: self.len as usize,
            });
        }
        if !self.msg_type.is_canonical() {
            return Err(InvalidStructureError::NonCanonicalVariant {
                field: "nlmsg_type",
                raw: u16::from(self.msg_type),
            });
        }
        Ok(())
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        // SAFETY: caller guarantees the buffer holds the layout
        unsafe {
            unchecked_slot_write(buf, NlMsgHdrLayout::LEN, self.len);
            unchecked_slot_write(buf, NlMsgHdrLayout::TYPE, u16::from(self.msg_type));
            unchecked_slot_write(buf, NlMsgHdrLayout::FLAGS, self.flags.bits());
            unchecked_slot_write(buf, NlMsgHdrLayout::SEQ, self.seq);
            unchecked_slot_write(buf, NlMsgHdrLayout::PID, self.pid);
        }
        NlMsgHdrLayout::SIZE_BYTES
    }
}

/// A netlink message borrowed from a receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetlinkMessage<'a> {
    /// Message header
    pub header: NlMsgHdr,
    /// Bytes following the header, up to `nlmsg_len`
    pub payload: &'a [u8],
}

/// Iterator over the messages of a netlink receive buffer
///
/// Iteration ends at the end of the buffer or after an `NLMSG_DONE` message, which is not
/// yielded. A malformed message yields a single error, after which the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct NetlinkMessages<'a> {
    buffer: DiagBuffer<'a>,
    finished: bool,
}
impl<'a> NetlinkMessages<'a> {
    /// Creates an iterator over the messages in `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buffer: DiagBuffer::new(buf),
            finished: false,
        }
    }

    /// Returns the bytes which were not consumed yet
    pub fn rest(&self) -> &'a [u8] {
        self.buffer.rest()
    }

    fn next_message(&mut self) -> Result<Option<NetlinkMessage<'a>>, DecodeError> {
        let start = self.buffer.position();
        let header: NlMsgHdr = self.buffer.read()?;

        let len = header.len as usize;
        if len < NlMsgHdrLayout::SIZE_BYTES {
            return Err(DecodeError::InvalidLength {
                at: "nlmsg_len",
                advertised: len,
                actual: NlMsgHdrLayout::SIZE_BYTES,
            });
        }
        let payload = self.buffer.slice_at(
            "nlmsg_payload",
            start + NlMsgHdrLayout::SIZE_BYTES,
            header.payload_len(),
        )?;

        tracing::trace!(msg_type = %header.msg_type, len, seq = header.seq, "Netlink message");

        if header.msg_type == NetlinkMessageType::Done {
            self.buffer.set_position(self.buffer.len())?;
            return Ok(None);
        }

        // The last message of a buffer may come without trailing padding
        let next = (start + nlmsg_align(len)).min(self.buffer.len());
        self.buffer.set_position(next)?;

        Ok(Some(NetlinkMessage { header, payload }))
    }
}
impl<'a> Iterator for NetlinkMessages<'a> {
    type Item = Result<NetlinkMessage<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.buffer.remaining() == 0 {
            return None;
        }

        match self.next_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
impl std::iter::FusedIterator for NetlinkMessages<'_> {}
