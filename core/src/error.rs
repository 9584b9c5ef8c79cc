//! Error types for the REST client core.
//!
//! # Design
//! Every failure is surfaced to the immediate caller; nothing is retried or
//! recovered internally. The variants line up with the stages of a call:
//! configuration is checked first, then the payload is encoded, the
//! transport runs, the status is interpreted and finally the body is
//! decoded.
//!
//! `Status` carries the raw response (status, headers, body text) so callers
//! that want a typed error body can decode it themselves.

use std::error::Error as StdError;

use thiserror::Error;

use crate::codec::WireFormat;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A connectivity failure that produced no HTTP response.
///
/// Wraps the transport's own error unchanged; `get_ref` and `into_inner`
/// give it back for downcasting.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct TransportError {
    source: BoxError,
    timed_out: bool,
}

impl TransportError {
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
            timed_out: false,
        }
    }

    /// Wrap a failure caused by the exchange exceeding its timeout.
    pub fn timeout(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
            timed_out: true,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

/// Errors returned by `RestClient` operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// No resource URI was set before the call. Raised before any I/O.
    #[error("resource URI must be set")]
    MissingResourceUri,

    /// The transport failed without receiving a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with an error status (400 and above).
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },

    /// The response body did not fit the declared response type.
    #[error("failed to decode {format} response: {message}")]
    Decode { format: WireFormat, message: String },

    /// The request payload could not be serialized.
    #[error("failed to encode {format} request: {message}")]
    Encode { format: WireFormat, message: String },
}

impl RestError {
    pub(crate) fn decode(format: WireFormat, err: impl ToString) -> Self {
        RestError::Decode {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(format: WireFormat, err: impl ToString) -> Self {
        RestError::Encode {
            format,
            message: err.to_string(),
        }
    }

    /// The HTTP status behind a `Status` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RestError::Transport(err) if err.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_uri_message() {
        assert_eq!(RestError::MissingResourceUri.to_string(), "resource URI must be set");
    }

    #[test]
    fn transport_error_keeps_the_original() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RestError::from(TransportError::new(io));
        assert_eq!(err.to_string(), "refused");
        assert!(!err.is_timeout());

        let RestError::Transport(inner) = err else {
            panic!("expected transport error");
        };
        let io = inner.into_inner().downcast::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn timeout_flag_is_visible_from_rest_error() {
        let err = RestError::from(TransportError::timeout("deadline elapsed"));
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn status_error_reports_code() {
        let err = RestError::Status {
            status: 404,
            headers: Vec::new(),
            body: "missing".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404: missing");
    }

    #[test]
    fn decode_error_names_the_format() {
        let err = RestError::decode(WireFormat::Json, "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "failed to decode JSON response: expected value at line 1 column 1"
        );
    }
}
