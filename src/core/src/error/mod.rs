// Copyright 2025 Atlas Maps Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors reported by the Atlas Maps client libraries.
//!
//! The client libraries distinguish between errors detected before a request
//! is sent (construction), errors in the transport (network or HTTP pipeline
//! failures), errors decoding an otherwise successful response, and responses
//! the protocol does not allow (unexpected status codes, accepted responses
//! without a usable polling location). [Error] offers a predicate for each
//! kind so callers can tell "reached the server, bad payload" apart from
//! "never got a usable response".

mod core_error;
mod http_error;
pub use core_error::*;
pub use http_error::*;
