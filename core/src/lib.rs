//! Strongly-typed REST client core.
//!
//! # Overview
//! A `RestClient` points at one resource URI and exposes verb operations
//! (`get`, `put`, `post`, `post_as_form`, `delete`, `head`). Each call
//! encodes the request payload in the wire format its declared type picks,
//! performs exactly one HTTP exchange through a `Transport`, and decodes the
//! response into the declared response type inside a `RestResponse`
//! envelope (status, body, headers).
//!
//! # Design
//! - Wire formats are chosen by marker types, not runtime inspection:
//!   `Json<T>`, `XmlDocument`, `FormData`, and `String` for raw text.
//! - The transport is a trait; `UreqTransport` is the default and tests
//!   substitute their own.
//! - `build_request` and `parse_response` are public so the I/O boundary
//!   stays explicit and hosts may run the exchange themselves.
//! - No retries, caching or pooling: every failure reaches the caller.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::RestClient;
pub use codec::{Decode, Payload, WireFormat};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{BoxError, RestError, TransportError};
pub use form::FormFields;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::RestResponse;
pub use transport::{Transport, UreqTransport};
pub use types::{EncodedBody, FormData, Json, XmlDocument};
pub use xmltree;
