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

//! Defines the HTTP seam used by the poller.
//!
//! The poller does not own an HTTP client. It issues its status requests
//! through [PollTransport], which the service crates implement on top of
//! their request pipeline and tests implement with fakes or mocks.

use atlas_core::Result;
use atlas_core::response::RawResponse;
use http::HeaderMap;
use url::Url;

/// The transport used for poll requests.
///
/// The poller issues plain GET requests against the status location returned
/// by the initial submission. The service crates supply an implementation
/// backed by their request pipeline; tests supply fakes.
///
/// Implementations should report network and pipeline failures with
/// [Error::transport][atlas_core::error::Error::transport] and must not
/// retry: retry policies belong to the pipeline below this seam, the poller
/// treats a single failed poll as terminal.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PollTransport: Send + Sync {
    /// Issues a GET request to `url` with the given headers.
    async fn get(&self, url: Url, headers: HeaderMap) -> Result<RawResponse>;
}
