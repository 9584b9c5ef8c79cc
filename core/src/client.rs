//! Typed REST client over a single resource URI.
//!
//! # Design
//! `RestClient` holds the resource URI, its configuration and a transport.
//! Every operation is split the same way: `build_request` encodes the
//! payload into an `HttpRequest`, the transport runs it, and
//! `parse_response` interprets the status and decodes the body. Both halves
//! are public, so hosts that perform the I/O themselves can drive them
//! directly.
//!
//! Status handling:
//! - 200 and 201 decode the body into the declared response type.
//! - Other statuses below 400 return an envelope with no body.
//! - 400 and above fail with `RestError::Status`, carrying the raw response.

use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::{Decode, Payload};
use crate::config::ClientConfig;
use crate::error::RestError;
use crate::form::FormFields;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::{is_success_status, RestResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::Json;

const NO_BODY: Option<Json<()>> = None;

/// Synchronous client for one REST resource.
///
/// Each call performs exactly one request/response cycle and keeps no state
/// between calls. Changing the resource URI needs `&mut self`.
#[derive(Debug, Clone)]
pub struct RestClient<T = UreqTransport> {
    transport: T,
    config: ClientConfig,
    resource_uri: Option<String>,
}

impl RestClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(UreqTransport::new(), config)
    }
}

impl Default for RestClient<UreqTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> RestClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            resource_uri: None,
        }
    }

    pub fn with_resource_uri(mut self, uri: impl Into<String>) -> Self {
        self.set_resource_uri(uri);
        self
    }

    pub fn set_resource_uri(&mut self, uri: impl Into<String>) {
        self.resource_uri = Some(uri.into());
    }

    /// The configured URI, if one has been set and is non-empty.
    pub fn resource_uri(&self) -> Option<&str> {
        self.resource_uri.as_deref().filter(|uri| !uri.is_empty())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_timeout(&mut self, timeout: std::time::Duration) {
        self.config.timeout = timeout;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode `payload` and describe the request without performing it.
    ///
    /// Fails with `MissingResourceUri` when no URI is set. An encoded body
    /// sets `content-type` and `content-length`; an absent body on PUT,
    /// POST or DELETE is announced as `content-length: 0`.
    pub fn build_request<P: Payload + ?Sized>(
        &self,
        method: HttpMethod,
        payload: &P,
    ) -> Result<HttpRequest, RestError> {
        let uri = self.resource_uri().ok_or(RestError::MissingResourceUri)?;

        let mut headers = Vec::new();
        let body = match payload.encode()? {
            Some(encoded) => {
                headers.push(("content-type".to_string(), encoded.content_type.to_string()));
                headers.push(("content-length".to_string(), encoded.content_length().to_string()));
                Some(encoded.bytes)
            }
            None => {
                if method.carries_body() {
                    headers.push(("content-length".to_string(), "0".to_string()));
                }
                None
            }
        };

        Ok(HttpRequest {
            method,
            uri: uri.to_string(),
            headers,
            body,
            timeout: self.config.timeout,
        })
    }

    /// Interpret the status of `response` and decode its body as `R`.
    pub fn parse_response<R: Decode>(&self, response: HttpResponse) -> Result<RestResponse<R>, RestError> {
        let response = check_status(response)?;
        let body = if is_success_status(response.status) {
            let text = std::str::from_utf8(&response.body)
                .map_err(|e| RestError::decode(R::FORMAT, e))?;
            Some(R::decode(text)?)
        } else {
            None
        };
        Ok(RestResponse {
            status: response.status,
            body,
            headers: response.headers,
        })
    }

    /// Perform one request/response cycle and decode the result as `R`.
    pub fn invoke<P, R>(&self, method: HttpMethod, payload: &P) -> Result<RestResponse<R>, RestError>
    where
        P: Payload + ?Sized,
        R: Decode,
    {
        let response = self.exchange(method, payload)?;
        self.parse_response(response)
    }

    pub fn get<R: Decode>(&self) -> Result<RestResponse<R>, RestError> {
        self.invoke(HttpMethod::Get, &NO_BODY)
    }

    /// PUT `payload`, discarding whatever the server answers with.
    pub fn put<P: Payload + ?Sized>(&self, payload: &P) -> Result<(), RestError> {
        self.send_discarding(HttpMethod::Put, payload)
    }

    pub fn put_with_response<P, R>(&self, payload: &P) -> Result<RestResponse<R>, RestError>
    where
        P: Payload + ?Sized,
        R: Decode,
    {
        self.invoke(HttpMethod::Put, payload)
    }

    /// POST `payload`, discarding whatever the server answers with.
    pub fn post<P: Payload + ?Sized>(&self, payload: &P) -> Result<(), RestError> {
        self.send_discarding(HttpMethod::Post, payload)
    }

    pub fn post_with_response<P, R>(&self, payload: &P) -> Result<RestResponse<R>, RestError>
    where
        P: Payload + ?Sized,
        R: Decode,
    {
        self.invoke(HttpMethod::Post, payload)
    }

    /// POST `payload` flattened into form fields.
    ///
    /// The value must serialize to an object of scalars; see
    /// `FormFields::from_serialize`.
    pub fn post_as_form<P, R>(&self, payload: &P) -> Result<RestResponse<R>, RestError>
    where
        P: Serialize + ?Sized,
        R: Decode,
    {
        self.resource_uri().ok_or(RestError::MissingResourceUri)?;
        let form = FormFields::from_serialize(payload)?.to_form_data();
        self.invoke(HttpMethod::Post, &form)
    }

    pub fn delete<P, R>(&self, payload: &P) -> Result<RestResponse<R>, RestError>
    where
        P: Payload + ?Sized,
        R: Decode,
    {
        self.invoke(HttpMethod::Delete, payload)
    }

    /// HEAD the resource. Only status and headers are populated.
    pub fn head(&self) -> Result<RestResponse<()>, RestError> {
        let response = check_status(self.exchange(HttpMethod::Head, &NO_BODY)?)?;
        Ok(RestResponse {
            status: response.status,
            body: None,
            headers: response.headers,
        })
    }

    fn send_discarding<P: Payload + ?Sized>(&self, method: HttpMethod, payload: &P) -> Result<(), RestError> {
        check_status(self.exchange(method, payload)?)?;
        Ok(())
    }

    fn exchange<P: Payload + ?Sized>(&self, method: HttpMethod, payload: &P) -> Result<HttpResponse, RestError> {
        let request = self.build_request(method, payload)?;
        debug!(
            %method,
            uri = %request.uri,
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "dispatching request"
        );

        let response = self.transport.execute(request)?;
        debug!(%method, status = response.status, "received response");
        Ok(response)
    }
}

/// Turn error statuses into `RestError::Status`.
fn check_status(response: HttpResponse) -> Result<HttpResponse, RestError> {
    if response.status < 400 {
        return Ok(response);
    }
    warn!(status = response.status, "request failed with error status");
    Err(RestError::Status {
        status: response.status,
        body: response.body_text().into_owned(),
        headers: response.headers,
    })
}
