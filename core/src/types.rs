//! Marker types that declare the wire format of a payload or response.
//!
//! # Design
//! The format is chosen by the type the caller names at the call site:
//! `Json<T>` for anything serde can handle, `XmlDocument` for structured
//! markup, `FormData` for a pre-joined form string and plain `String` for
//! raw text responses. No runtime type inspection is involved.

use std::ops::{Deref, DerefMut};

use xmltree::Element;

use crate::codec::WireFormat;
use crate::error::RestError;

/// A value sent or received as JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

/// An owned XML document, sent as `text/xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument(Element);

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self(root)
    }

    /// Parse markup into a document. Malformed input is a decode error.
    pub fn parse(text: &str) -> Result<Self, RestError> {
        Element::parse(text.as_bytes())
            .map(Self)
            .map_err(|e| RestError::decode(WireFormat::Xml, e))
    }

    pub fn root(&self) -> &Element {
        &self.0
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.0
    }

    pub fn into_root(self) -> Element {
        self.0
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RestError> {
        let mut bytes = Vec::new();
        self.0
            .write(&mut bytes)
            .map_err(|e| RestError::encode(WireFormat::Xml, e))?;
        Ok(bytes)
    }
}

impl From<Element> for XmlDocument {
    fn from(root: Element) -> Self {
        Self(root)
    }
}

/// A form body that is already joined as `key=value&key=value`.
///
/// Sent verbatim as `application/x-www-form-urlencoded`; see `FormFields`
/// for building one from a structured value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FormData(String);

impl FormData {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Bytes ready for transmission plus the content type that labels them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl EncodedBody {
    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }
}
