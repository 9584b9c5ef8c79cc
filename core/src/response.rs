//! The uniform result of an enveloped call.

use crate::http::find_header;

/// Status code, decoded body and headers of one response.
///
/// `body` is only populated for 200 OK and 201 Created. Other non-error
/// statuses yield an envelope with `body` unset, and `head` never decodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse<T> {
    pub status: u16,
    pub body: Option<T>,
    pub headers: Vec<(String, String)>,
}

impl<T> RestResponse<T> {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }
}

/// OK and Created are the only statuses whose body is decoded.
pub fn is_success_status(status: u16) -> bool {
    status == 200 || status == 201
}
