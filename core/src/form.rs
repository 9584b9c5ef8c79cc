//! Form field sets for `application/x-www-form-urlencoded` bodies.
//!
//! Building a form body is two explicit steps: a serializable value is
//! flattened into an ordered list of `(name, value)` strings, then the list
//! is percent-escaped and joined. Field order is the order in which serde
//! emits the fields (declaration order for derived structs).

use serde::Serialize;
use serde_json::Value;

use crate::codec::WireFormat;
use crate::error::RestError;
use crate::types::FormData;

/// An ordered mapping from field name to unescaped string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a value that serializes to a JSON object.
    ///
    /// Strings are taken as-is, numbers and booleans use their JSON text and
    /// `null` becomes an empty value. Nested arrays or objects have no flat
    /// form representation and are rejected.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RestError> {
        let value = serde_json::to_value(value).map_err(|e| RestError::encode(WireFormat::Form, e))?;
        let Value::Object(map) = value else {
            return Err(RestError::encode(
                WireFormat::Form,
                "form payload must serialize to an object",
            ));
        };

        let mut fields = Self::new();
        for (name, value) in map {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(RestError::encode(
                        WireFormat::Form,
                        format!("field `{name}` is not a scalar value"),
                    ));
                }
            };
            fields.push(name, value);
        }
        Ok(fields)
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Escape every name and value and join them as `name=value&...`.
    pub fn to_form_data(&self) -> FormData {
        let joined = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        FormData::new(joined)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
