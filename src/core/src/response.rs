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

//! Response types.
//!
//! This module contains types related to Atlas Maps service responses. The
//! request pipeline produces a [RawResponse]; the service crates decode its
//! body into typed models and surface the [ResponseMetadata] for
//! diagnostics.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// The transport-level metadata of a service response.
///
/// Consists of the HTTP status code and the response headers. Completion
/// callbacks receive this alongside the decoded result (or the failure), so
/// callers can inspect what actually came over the wire.
#[derive(Clone, Debug)]
pub struct ResponseMetadata {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseMetadata {
    /// Creates new metadata from a status code and headers.
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the value of the named header, if present and representable
    /// as a string.
    ///
    /// Header names are case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use atlas_maps_core::response::ResponseMetadata;
    /// # use http::{HeaderMap, HeaderValue, StatusCode};
    /// let mut headers = HeaderMap::new();
    /// headers.insert("Location", HeaderValue::from_static("https://atlas.example.com/batch/8"));
    /// let metadata = ResponseMetadata::new(StatusCode::ACCEPTED, headers);
    /// assert_eq!(metadata.header("location"), Some("https://atlas.example.com/batch/8"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A raw service response: metadata plus an optional body.
///
/// This is what the submission and poll contracts produce. The body is
/// `None` when the service answered without a payload, as it typically does
/// for `202 Accepted`.
#[derive(Clone, Debug)]
pub struct RawResponse {
    metadata: ResponseMetadata,
    body: Option<Bytes>,
}

impl RawResponse {
    /// Creates a new raw response.
    pub fn new(metadata: ResponseMetadata, body: Option<Bytes>) -> Self {
        Self { metadata, body }
    }

    /// Returns the response metadata.
    pub fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    /// Returns the raw body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consumes the response, returning the metadata and body.
    pub fn into_parts(self) -> (ResponseMetadata, Option<Bytes>) {
        (self.metadata, self.body)
    }
}
