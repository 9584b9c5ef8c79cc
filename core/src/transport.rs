//! The transport seam and its default ureq implementation.
//!
//! # Design
//! `Transport` is the only collaborator the client needs: it runs one
//! `HttpRequest` and returns the `HttpResponse`, whatever the status. Status
//! interpretation stays in the client so every transport behaves the same.
//! A transport error means no response arrived at all.

use std::time::Duration;

use ureq::typestate::WithBody;
use ureq::RequestBuilder;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes exactly one HTTP request/response cycle.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// A fresh agent is built per call, so no connections are pooled or shared
/// between calls. Redirects follow ureq's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    fn agent(timeout: Duration) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = Self::agent(request.timeout);
        let HttpRequest {
            method,
            uri,
            headers,
            body,
            ..
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(agent.get(&uri), &headers).call(),
            (HttpMethod::Head, _) => with_headers(agent.head(&uri), &headers).call(),
            (HttpMethod::Delete, None) => with_headers(agent.delete(&uri), &headers).call(),
            (HttpMethod::Delete, Some(bytes)) => {
                send(with_headers(agent.delete(&uri), &headers).force_send_body(), Some(bytes))
            }
            (HttpMethod::Post, body) => send(with_headers(agent.post(&uri), &headers), body),
            (HttpMethod::Put, body) => send(with_headers(agent.put(&uri), &headers), body),
        };

        let mut response = result.map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // ureq caps reads at 10 MiB unless told otherwise.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(transport_error)?;

        Ok(HttpResponse { status, headers, body })
    }
}

// ureq derives content-length from the body it sends.
fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<Vec<u8>>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(&bytes[..]),
        None => builder.send_empty(),
    }
}

fn transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::timeout(err),
        err => TransportError::new(err),
    }
}
