use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CATALOG_XML: &str = "<catalog><item>anvil</item><item>rocket</item></catalog>";
pub const NOTE_TEXT: &str = "plain text from the mock server\n";
/// Served by `/binary/{code}`; not valid UTF-8.
pub const BINARY_BODY: &[u8] = &[0xff, 0xfe, 0x00, 0x41];
/// Size of the `/large` body, just over ureq's default read limit.
pub const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Widget {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct CreateWidget {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateWidget {
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

impl UpdateWidget {
    /// Overwrite only the fields that were sent.
    pub fn apply_to(self, widget: &mut Widget) {
        if let Some(name) = self.name {
            widget.name = name;
        }
        widget.quantity = self.quantity.unwrap_or(widget.quantity);
    }
}

/// What `/echo` saw on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub body: String,
}

/// Widgets in creation order.
pub type Db = Arc<RwLock<Vec<Widget>>>;

pub fn app() -> Router {
    let db: Db = Arc::default();
    Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route("/widgets/{id}", any(widget_item))
        .route("/forms", post(accept_form))
        .route("/documents", get(catalog).post(echo_document))
        .route("/notes", get(note))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status_only))
        .route("/slow", get(slow))
        .route("/binary/{code}", any(binary))
        .route("/large", get(large))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_widgets(State(db): State<Db>) -> Json<Vec<Widget>> {
    Json(db.read().await.clone())
}

async fn create_widget(
    State(db): State<Db>,
    Json(input): Json<CreateWidget>,
) -> (StatusCode, Json<Widget>) {
    let widget = Widget {
        id: Uuid::new_v4(),
        name: input.name,
        quantity: input.quantity,
    };
    db.write().await.push(widget.clone());
    (StatusCode::CREATED, Json(widget))
}

/// GET/HEAD reads, PUT patches, DELETE removes and returns the widget.
async fn widget_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    method: Method,
    body: Bytes,
) -> Result<Json<Widget>, StatusCode> {
    let mut widgets = db.write().await;
    let slot = widgets
        .iter()
        .position(|w| w.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let widget = match method {
        Method::GET | Method::HEAD => widgets[slot].clone(),
        Method::PUT => {
            let update: UpdateWidget =
                serde_json::from_slice(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
            update.apply_to(&mut widgets[slot]);
            widgets[slot].clone()
        }
        Method::DELETE => widgets.remove(slot),
        _ => return Err(StatusCode::METHOD_NOT_ALLOWED),
    };
    Ok(Json(widget))
}

async fn accept_form(Form(fields): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(fields)
}

async fn catalog() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/xml")], CATALOG_XML)
}

async fn echo_document(headers: HeaderMap, body: String) -> Result<impl IntoResponse, StatusCode> {
    let is_xml = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/xml"));
    if !is_xml {
        return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
    Ok((StatusCode::CREATED, [(header::CONTENT_TYPE, "text/xml")], body))
}

async fn note() -> &'static str {
    NOTE_TEXT
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(Echo {
        method: method.to_string(),
        content_type: header_text(header::CONTENT_TYPE),
        content_length: header_text(header::CONTENT_LENGTH),
        body,
    })
}

async fn status_only(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {code}"))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "finally"
}

async fn binary(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        BINARY_BODY,
    )
}

async fn large() -> String {
    "a".repeat(LARGE_BODY_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_serializes_to_json() {
        let widget = Widget {
            id: Uuid::nil(),
            name: "Sprocket".to_string(),
            quantity: 4,
        };
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["name"], "Sprocket");
        assert_eq!(json["quantity"], 4);
    }

    #[test]
    fn create_widget_defaults_quantity_to_zero() {
        let input: CreateWidget = serde_json::from_str(r#"{"name":"Gear"}"#).unwrap();
        assert_eq!(input.name, "Gear");
        assert_eq!(input.quantity, 0);
    }

    #[test]
    fn create_widget_rejects_missing_name() {
        let result: Result<CreateWidget, _> = serde_json::from_str(r#"{"quantity":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_widget_all_fields_optional() {
        let input: UpdateWidget = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.quantity.is_none());
    }

    #[test]
    fn update_overwrites_only_sent_fields() {
        let mut widget = Widget {
            id: Uuid::nil(),
            name: "Sprocket".to_string(),
            quantity: 4,
        };
        let update: UpdateWidget = serde_json::from_str(r#"{"quantity":9}"#).unwrap();
        update.apply_to(&mut widget);
        assert_eq!((widget.name.as_str(), widget.quantity), ("Sprocket", 9));

        let update: UpdateWidget = serde_json::from_str(r#"{"name":"Cog"}"#).unwrap();
        update.apply_to(&mut widget);
        assert_eq!((widget.name.as_str(), widget.quantity), ("Cog", 9));
    }

    #[test]
    fn binary_body_is_not_utf8() {
        assert!(std::str::from_utf8(BINARY_BODY).is_err());
    }

    #[test]
    fn echo_omits_nothing_when_serialized() {
        let echo = Echo {
            method: "GET".to_string(),
            content_type: None,
            content_length: None,
            body: String::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert!(json["content_type"].is_null());
        assert_eq!(json["method"], "GET");
    }
}
