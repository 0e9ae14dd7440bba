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

//! Generic structure codec
//!
//! Layouts describe structures, views read them in place, models own the decoded values.

pub mod buffer;
pub mod debug;
pub mod decode;
pub mod encode;
pub mod layout;
pub mod read;
pub mod view;
pub mod write;
