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

use crate::response::ResponseMetadata;
use bytes::Bytes;
use std::collections::HashMap;

/// Details about an HTTP response the protocol does not allow.
///
/// Carries the status code, headers, and (when available) the raw payload of
/// the offending response, so callers can diagnose failures without access
/// to the wire.
#[derive(Clone, Debug, Default)]
pub struct HttpError {
    status_code: u16,
    headers: HashMap<String, String>,
    payload: Option<Bytes>,
}

impl HttpError {
    /// Creates a new [HttpError] with the given status code, headers, and
    /// payload.
    pub fn new(status_code: u16, headers: HashMap<String, String>, payload: Option<Bytes>) -> Self {
        Self {
            status_code,
            headers,
            payload,
        }
    }

    /// Creates a new [HttpError] from response metadata and an optional
    /// payload.
    ///
    /// Headers with non-printable values are dropped.
    pub fn from_metadata(metadata: &ResponseMetadata, payload: Option<Bytes>) -> Self {
        let headers = metadata
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        Self {
            status_code: metadata.status().as_u16(),
            headers,
            payload,
        }
    }

    /// Returns the status code of the offending response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the headers of the offending response.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the raw payload of the offending response, if any.
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HTTP error: code={}, headers={:?}",
            self.status_code, self.headers
        )?;
        if let Some(payload) = self.payload() {
            write!(f, ", payload:\n{payload:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue, StatusCode};

    #[test]
    fn display_without_payload() {
        let headers = HashMap::from_iter(
            [("content-type", "application/json")].map(|(k, v)| (k.to_string(), v.to_string())),
        );
        let error = HttpError::new(400, headers, None);
        let display = format!("{error}");

        assert!(
            display.contains(r#""content-type": "application/json""#),
            "missing header in {error}"
        );
        assert!(display.contains("code=400"), "missing code in {error}");
        assert!(
            !display.contains("payload:"),
            "unexpected payload in {error}"
        );
    }

    #[test]
    fn display_with_payload() {
        let error = HttpError::new(
            500,
            HashMap::new(),
            Some(Bytes::from_static(b"stack overflow in teapot")),
        );
        let display = format!("{error}");

        assert!(display.contains("code=500"), "missing code in {error}");
        assert!(
            display.contains("payload:\nb\"stack overflow in teapot\""),
            "missing payload in {error}"
        );
    }

    #[test]
    fn from_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let metadata = ResponseMetadata::new(StatusCode::IM_A_TEAPOT, headers);
        let error = HttpError::from_metadata(&metadata, Some(Bytes::from_static(b"short and stout")));

        assert_eq!(error.status_code(), 418);
        assert_eq!(
            error.headers().get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(
            error.payload(),
            Some(&Bytes::from_static(b"short and stout"))
        );
    }

    #[test]
    fn from_metadata_drops_opaque_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-opaque",
            HeaderValue::from_bytes(&[0xfeu8, 0xff]).unwrap(),
        );
        let metadata = ResponseMetadata::new(StatusCode::BAD_REQUEST, headers);
        let error = HttpError::from_metadata(&metadata, None);
        assert!(error.headers().is_empty(), "{error:?}");
    }
}
