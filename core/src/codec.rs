//! Payload encoding and response decoding.
//!
//! # Design
//! Exactly one encoding is picked per request and exactly one decoding per
//! response, both fixed by the declared type:
//!
//! | declared type   | request                        | response            |
//! |-----------------|--------------------------------|---------------------|
//! | `XmlDocument`   | XML, `text/xml`                | parsed document     |
//! | `FormData`      | verbatim, form-urlencoded      | n/a                 |
//! | `String`        | n/a                            | raw text, unchanged |
//! | `Json<T>`       | JSON, UTF-8 without BOM        | JSON into `T`       |
//!
//! `Option<P>` is a payload too: `None` means no body at all, and the
//! encoder is skipped.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RestError;
use crate::types::{EncodedBody, FormData, Json, XmlDocument};

/// The wire format selected for a request or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Json,
    Xml,
    Form,
    Text,
}

impl WireFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            WireFormat::Json => "application/json; charset=utf-8",
            WireFormat::Xml => "text/xml",
            WireFormat::Form => "application/x-www-form-urlencoded",
            WireFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireFormat::Json => "JSON",
            WireFormat::Xml => "XML",
            WireFormat::Form => "form",
            WireFormat::Text => "text",
        };
        f.write_str(name)
    }
}

/// A request value that knows how to put itself on the wire.
pub trait Payload {
    const FORMAT: WireFormat;

    /// Encode the value. `Ok(None)` means there is no body to send.
    fn encode(&self) -> Result<Option<EncodedBody>, RestError>;
}

/// A response type that knows how to read itself from a body.
pub trait Decode: Sized {
    const FORMAT: WireFormat;

    fn decode(text: &str) -> Result<Self, RestError>;
}

impl<T: Serialize> Payload for Json<T> {
    const FORMAT: WireFormat = WireFormat::Json;

    fn encode(&self) -> Result<Option<EncodedBody>, RestError> {
        let bytes = serde_json::to_vec(&self.0)
            .map_err(|e| RestError::encode(<Self as Payload>::FORMAT, e))?;
        Ok(Some(EncodedBody {
            bytes,
            content_type: <Self as Payload>::FORMAT.content_type(),
        }))
    }
}

impl Payload for XmlDocument {
    const FORMAT: WireFormat = WireFormat::Xml;

    fn encode(&self) -> Result<Option<EncodedBody>, RestError> {
        Ok(Some(EncodedBody {
            bytes: self.to_bytes()?,
            content_type: <Self as Payload>::FORMAT.content_type(),
        }))
    }
}

impl Payload for FormData {
    const FORMAT: WireFormat = WireFormat::Form;

    fn encode(&self) -> Result<Option<EncodedBody>, RestError> {
        Ok(Some(EncodedBody {
            bytes: self.as_str().as_bytes().to_vec(),
            content_type: <Self as Payload>::FORMAT.content_type(),
        }))
    }
}

impl<P: Payload> Payload for Option<P> {
    const FORMAT: WireFormat = P::FORMAT;

    fn encode(&self) -> Result<Option<EncodedBody>, RestError> {
        match self {
            Some(payload) => payload.encode(),
            None => Ok(None),
        }
    }
}

impl<P: Payload + ?Sized> Payload for &P {
    const FORMAT: WireFormat = P::FORMAT;

    fn encode(&self) -> Result<Option<EncodedBody>, RestError> {
        (**self).encode()
    }
}

impl<T: DeserializeOwned> Decode for Json<T> {
    const FORMAT: WireFormat = WireFormat::Json;

    fn decode(text: &str) -> Result<Self, RestError> {
        serde_json::from_str(text)
            .map(Json)
            .map_err(|e| RestError::decode(<Self as Decode>::FORMAT, e))
    }
}

impl Decode for XmlDocument {
    const FORMAT: WireFormat = WireFormat::Xml;

    fn decode(text: &str) -> Result<Self, RestError> {
        XmlDocument::parse(text)
    }
}

impl Decode for String {
    const FORMAT: WireFormat = WireFormat::Text;

    fn decode(text: &str) -> Result<Self, RestError> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        a: i64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: u32,
        lines: Vec<String>,
        note: Option<String>,
    }

    #[test]
    fn json_payload_is_utf8_without_bom() {
        let body = Json(Record { a: 1 }).encode().unwrap().unwrap();
        assert_eq!(body.content_type, "application/json; charset=utf-8");
        assert_eq!(body.bytes, br#"{"a":1}"#);
        assert_ne!(&body.bytes[..1], b"\xEF");
        assert_eq!(body.content_length(), 7);
    }

    #[test]
    fn json_payload_keeps_non_ascii_as_utf8() {
        let body = Json("café").encode().unwrap().unwrap();
        assert_eq!(String::from_utf8(body.bytes).unwrap(), "\"café\"");
    }

    #[test]
    fn xml_payload_is_labelled_text_xml() {
        let doc = XmlDocument::parse("<ping/>").unwrap();
        let body = doc.encode().unwrap().unwrap();
        assert_eq!(body.content_type, "text/xml");
        assert!(std::str::from_utf8(&body.bytes).unwrap().contains("<ping"));
    }

    #[test]
    fn form_payload_is_sent_verbatim() {
        let body = FormData::new("x=1&y=a%20b").encode().unwrap().unwrap();
        assert_eq!(body.content_type, "application/x-www-form-urlencoded");
        assert_eq!(body.bytes, b"x=1&y=a%20b");
    }

    #[test]
    fn absent_payload_produces_no_body() {
        let payload: Option<Json<Record>> = None;
        assert!(payload.encode().unwrap().is_none());
        assert_eq!(<Option<Json<Record>> as Payload>::FORMAT, WireFormat::Json);
    }

    #[test]
    fn types_used_both_ways_agree_on_their_format() {
        assert_eq!(<XmlDocument as Payload>::FORMAT, WireFormat::Xml);
        assert_eq!(<XmlDocument as Decode>::FORMAT, WireFormat::Xml);
        assert_eq!(<Json<Record> as Payload>::FORMAT, WireFormat::Json);
        assert_eq!(<Json<Record> as Decode>::FORMAT, WireFormat::Json);

        let doc = XmlDocument::parse("<ping/>").unwrap();
        assert_eq!(doc.encode().unwrap().unwrap().content_type, WireFormat::Xml.content_type());
        let body = Json(Record { a: 2 }).encode().unwrap().unwrap();
        assert_eq!(body.content_type, WireFormat::Json.content_type());
    }

    #[test]
    fn present_optional_payload_encodes_inner() {
        let payload = Some(FormData::new("k=v"));
        let body = payload.encode().unwrap().unwrap();
        assert_eq!(body.bytes, b"k=v");
    }

    #[test]
    fn json_response_decodes_into_declared_type() {
        let Json(record) = Json::<Record>::decode(r#"{"a":1}"#).unwrap();
        assert_eq!(record, Record { a: 1 });
    }

    #[test]
    fn json_response_of_wrong_shape_is_a_decode_error() {
        let err = Json::<Record>::decode(r#"{"a":"one"}"#).unwrap_err();
        assert!(matches!(err, RestError::Decode { format: WireFormat::Json, .. }));

        let err = Json::<Record>::decode("not json").unwrap_err();
        assert!(matches!(err, RestError::Decode { format: WireFormat::Json, .. }));
    }

    #[test]
    fn text_response_is_returned_unchanged() {
        let text = String::decode("  {\"a\":1} <not parsed>\n").unwrap();
        assert_eq!(text, "  {\"a\":1} <not parsed>\n");
    }

    #[test]
    fn xml_response_is_parsed() {
        let doc = XmlDocument::decode("<status><ok>true</ok></status>").unwrap();
        assert_eq!(doc.root().name, "status");
        assert!(XmlDocument::decode("plain text").is_err());
    }

    #[test]
    fn json_values_round_trip_through_encode_and_decode() {
        let orders = vec![
            Order { id: 1, lines: vec![], note: None },
            Order { id: 2, lines: vec!["bolt".into(), "nut".into()], note: Some("a \"quoted\" note".into()) },
            Order { id: u32::MAX, lines: vec!["ünïcödé".into()], note: Some(String::new()) },
        ];
        for order in orders {
            let body = Json(order.clone()).encode().unwrap().unwrap();
            let text = String::from_utf8(body.bytes).unwrap();
            let Json(back) = Json::<Order>::decode(&text).unwrap();
            assert_eq!(back, order);
        }
    }

    #[test]
    fn xml_documents_round_trip_through_encode_and_decode() {
        let doc = XmlDocument::parse("<catalog><item>one</item><item>two</item></catalog>").unwrap();
        let body = doc.encode().unwrap().unwrap();
        let back = XmlDocument::decode(std::str::from_utf8(&body.bytes).unwrap()).unwrap();
        assert_eq!(back.root().name, "catalog");
        let items: Vec<_> = back
            .root()
            .children
            .iter()
            .filter_map(|node| node.as_element())
            .filter_map(|e| e.get_text())
            .collect();
        assert_eq!(items, ["one", "two"]);
    }
}
