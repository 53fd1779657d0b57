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

use super::HttpError;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by all client libraries.
///
/// The client libraries report errors from multiple sources. The transport
/// may be unable to reach the service, the service may answer with a status
/// code the protocol does not allow, the response body may not match the
/// expected schema, or the request may be impossible to form in the first
/// place.
///
/// Most applications will just return the error or log it, without further
/// action. Applications that need to interrogate the failure can use the
/// predicates on this type, and query the error
/// [source][std::error::Error::source] for deeper information.
///
/// # Example
/// ```
/// use atlas_maps_core::error::Error;
/// fn handle(e: Error) {
///     if e.is_deserialization() {
///         println!("reached the service, but the payload was unusable: {e}");
///     } else if e.is_transport() {
///         println!("never got a usable response: {e}");
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

#[derive(Debug)]
enum ErrorKind {
    Construction,
    MalformedAccepted,
    Transport,
    Deserialization,
    UnexpectedStatus(u16),
    Cancelled,
}

impl Error {
    /// Creates an error representing a request that could not be formed.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use atlas_maps_core::error::Error;
    /// let error = Error::construction("invalid header value");
    /// assert!(error.is_construction());
    /// assert!(error.source().is_some());
    /// ```
    pub fn construction<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Construction,
            source: Some(source.into()),
        }
    }

    /// The request could not even be formed.
    ///
    /// This is always a client-side generated error, reported before any
    /// network activity. It is never retried: forming the request is
    /// deterministic and will fail again with the same inputs.
    pub fn is_construction(&self) -> bool {
        matches!(self.kind, ErrorKind::Construction)
    }

    /// Creates an error representing an accepted response that cannot be
    /// polled.
    ///
    /// Long-running operations answer their initial request with
    /// `202 Accepted` and a `Location` header naming the status endpoint.
    /// An accepted response without a usable location cannot make progress.
    ///
    /// # Example
    /// ```
    /// use atlas_maps_core::error::Error;
    /// let error = Error::malformed_accepted("missing Location header");
    /// assert!(error.is_malformed_accepted());
    /// ```
    pub fn malformed_accepted<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::MalformedAccepted,
            source: Some(source.into()),
        }
    }

    /// The operation was accepted, but the response lacks a usable polling
    /// location.
    ///
    /// This is terminal: the service acknowledged the request, but the client
    /// has no way to find out how it ended.
    pub fn is_malformed_accepted(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedAccepted)
    }

    /// Creates an error representing a transport failure.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use atlas_maps_core::error::Error;
    /// let error = Error::transport("simulated connection reset");
    /// assert!(error.is_transport());
    /// assert!(error.source().is_some());
    /// ```
    pub fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Transport,
            source: Some(source.into()),
        }
    }

    /// The transport reported an error before a response was received.
    ///
    /// The request may or may not have reached the service. If the request
    /// mutates any state in the service, it may or may not be safe to attempt
    /// it again.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport)
    }

    /// Creates an error representing a deserialization problem.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use atlas_maps_core::error::Error;
    /// let error = Error::deser("simulated problem");
    /// assert!(error.is_deserialization());
    /// assert!(error.source().is_some());
    /// ```
    pub fn deser<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response body did not match the expected schema.
    ///
    /// Unlike [is_transport][Error::is_transport], the service was reached
    /// and produced a response, but the payload was unusable.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }

    /// Creates an error representing a status code the protocol does not
    /// allow.
    ///
    /// # Example
    /// ```
    /// use atlas_maps_core::error::{Error, HttpError};
    /// let error = Error::unexpected_status(HttpError::new(500, Default::default(), None));
    /// assert!(error.is_unexpected_status());
    /// assert_eq!(error.http_status(), Some(500));
    /// ```
    pub fn unexpected_status(details: HttpError) -> Self {
        Self {
            kind: ErrorKind::UnexpectedStatus(details.status_code()),
            source: Some(Box::new(details)),
        }
    }

    /// The service answered with a status code outside the allowed set.
    ///
    /// The status code, headers, and payload are available through the
    /// [HttpError] in the error [source][std::error::Error::source].
    pub fn is_unexpected_status(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedStatus(_))
    }

    /// Creates an error representing an operation cancelled before it
    /// resolved.
    ///
    /// # Example
    /// ```
    /// use atlas_maps_core::error::Error;
    /// let error = Error::cancelled();
    /// assert!(error.is_cancelled());
    /// ```
    pub fn cancelled() -> Self {
        Self {
            kind: ErrorKind::Cancelled,
            source: None,
        }
    }

    /// The operation was cancelled before it reached a result.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// The HTTP status code associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::UnexpectedStatus(code) => Some(code),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Construction => write!(f, "cannot create the request")?,
            ErrorKind::MalformedAccepted => write!(
                f,
                "the operation was accepted, but the response cannot be polled"
            )?,
            ErrorKind::Transport => write!(f, "the transport reports an error")?,
            ErrorKind::Deserialization => write!(f, "cannot deserialize the response body")?,
            ErrorKind::UnexpectedStatus(code) => {
                write!(f, "the service returned an unexpected HTTP status ({code})")?
            }
            ErrorKind::Cancelled => {
                write!(f, "the operation was cancelled before it completed")?
            }
        };
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
