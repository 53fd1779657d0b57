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

//! Simplifies the implementation of `Poller`.

use crate::CLIENT_ID_HEADER;
use atlas_core::Result;
use atlas_core::error::Error;
use atlas_core::response::ResponseMetadata;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderValue};
use url::Url;

/// The accepted response carried no `Location` header.
#[derive(Debug, thiserror::Error)]
#[error("the accepted response has no Location header")]
pub(crate) struct MissingLocation;

/// Extracts the polling location from an accepted response.
///
/// The `Location` header (case-insensitive) must parse as an absolute URL.
/// A missing or unparsable location is terminal, the operation can never be
/// polled.
pub(crate) fn extract_location(metadata: &ResponseMetadata) -> Result<Url> {
    let location = metadata
        .header(LOCATION.as_str())
        .ok_or_else(|| Error::malformed_accepted(MissingLocation))?;
    Url::parse(location).map_err(Error::malformed_accepted)
}

/// Builds the fixed header set sent with every poll request.
pub(crate) fn poll_headers(client_id: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(id) = client_id {
        let value = HeaderValue::from_str(id).map_err(Error::construction)?;
        headers.insert(CLIENT_ID_HEADER, value);
    }
    Ok(headers)
}

/// Decodes the final response body into the caller's result type.
pub(crate) fn decode_body<R>(body: Option<&Bytes>) -> Result<R>
where
    R: serde::de::DeserializeOwned,
{
    let body = body.ok_or_else(|| Error::deser("the final response has no body"))?;
    serde_json::from_slice(body).map_err(Error::deser)
}
