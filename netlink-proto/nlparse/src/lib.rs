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

//! NlParse: A library for decoding kernel socket diagnostics and dumping diagnostic maps.
//!
//! The library is split into three layers:
//!
//! * [`core`] describes fixed kernel structures as static field layouts and provides the
//!   generic machinery to decode them from, and encode them into, byte buffers.
//! * The protocol modules ([`netlink`], [`inet_diag`], [`primitives`]) define the concrete
//!   structures exchanged with the kernel, e.g. `struct nlmsghdr` and `struct inet_diag_msg`.
//! * [`text`], [`table`] and [`dump`] turn decoded key/value records into canonical base64 text
//!   and human readable table reports.
//!
//! Decoded records own their data. No record keeps a reference into the buffer it was decoded
//! from, so kernel receive buffers can be reused as soon as decoding returns.

pub mod core;
pub mod dump;
pub mod table;
pub mod text;

mod proto;
pub use proto::*;
