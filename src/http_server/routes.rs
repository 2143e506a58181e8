//! sharemap HTTP Routes
//!
//! Introspection, validation and send endpoints over one schema section.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::codec::{Codec, FieldLayout};
use crate::form::{convert_values, default_values, group_fields, FieldGroup, GroupedFields};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{validate_record, SchemaTable};
use crate::transport::{send_frame_async, Endpoint};

// ==================
// Shared State
// ==================

/// Schema section and send defaults shared across handlers.
///
/// Built once at startup; handlers never reload the schema.
#[derive(Debug)]
pub struct SharemapState {
    section: String,
    codec: Codec,
    groups: Vec<FieldGroup>,
    udp_host: String,
    udp_port: u16,
}

impl SharemapState {
    pub fn new(section: impl Into<String>, table: SchemaTable) -> Self {
        Self {
            section: section.into(),
            codec: Codec::new(table),
            groups: FieldGroup::defaults(),
            udp_host: "localhost".to_string(),
            udp_port: 5000,
        }
    }

    pub fn with_groups(mut self, groups: Vec<FieldGroup>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_udp_target(mut self, host: impl Into<String>, port: u16) -> Self {
        self.udp_host = host.into();
        self.udp_port = port;
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    fn table(&self) -> &SchemaTable {
        self.codec.table()
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse<'a> {
    pub section: &'a str,
    pub frame_length: usize,
    pub version_id: String,
    pub fields: &'a [FieldLayout],
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Value,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub config: Option<Map<String, Value>>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
    pub bytes_sent: usize,
}

// ==================
// Routes
// ==================

/// Create the sharemap routes
pub fn sharemap_routes(state: Arc<SharemapState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/schema", get(schema_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/defaults", get(defaults_handler))
        .route("/api/groups", get(groups_handler))
        .route("/api/validate", post(validate_handler))
        .route("/api/send", post(send_handler))
        .route("/export", get(export_handler))
        .with_state(state)
}

// ==================
// Introspection Handlers
// ==================

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn schema_handler(State(state): State<Arc<SharemapState>>) -> Json<Value> {
    Json(state.table().to_document())
}

async fn layout_handler(State(state): State<Arc<SharemapState>>) -> Response {
    let layout = state.codec.layout();
    Json(LayoutResponse {
        section: &state.section,
        frame_length: layout.frame_length(),
        version_id: format!("{:#018x}", layout.version_id()),
        fields: layout.fields(),
    })
    .into_response()
}

async fn defaults_handler(State(state): State<Arc<SharemapState>>) -> Json<Value> {
    Json(Value::Object(default_values(state.table())))
}

async fn groups_handler(State(state): State<Arc<SharemapState>>) -> Response {
    let grouped: Vec<GroupedFields<'_>> = group_fields(state.table(), &state.groups);
    Json(grouped).into_response()
}

async fn export_handler(State(state): State<Arc<SharemapState>>) -> Response {
    let defaults = Value::Object(default_values(state.table()));
    let body = serde_json::to_string_pretty(&defaults).unwrap_or_else(|_| defaults.to_string());
    let disposition = format!("attachment; filename=\"sharemap_{}.json\"", state.section);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

// ==================
// Validation / Send Handlers
// ==================

async fn validate_handler(
    State(state): State<Arc<SharemapState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<ValidateResponse>) {
    let values = match body {
        Ok(Json(Value::Object(values))) if !values.is_empty() => values,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidateResponse {
                    valid: false,
                    errors: json!({ "_general": ["No data provided"] }),
                }),
            )
        }
    };

    let report = validate_record(state.table(), &values);
    (
        StatusCode::OK,
        Json(ValidateResponse {
            valid: report.is_valid(),
            errors: report.to_json(),
        }),
    )
}

fn rejected(reason: &str, body: Value) -> (StatusCode, Json<Value>) {
    log_event_with_fields(Event::ConfigRejected, &[("reason", reason)]);
    (StatusCode::BAD_REQUEST, Json(body))
}

async fn send_handler(
    State(state): State<Arc<SharemapState>>,
    body: Result<Json<SendRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(e) => {
            let message = e.body_text();
            return rejected(&message, json!({ "success": false, "error": message }));
        }
    };
    let Some(config) = request.config else {
        return rejected(
            "missing config",
            json!({ "success": false, "error": "No configuration provided" }),
        );
    };

    let report = validate_record(state.table(), &config);
    if !report.is_valid() {
        let summary = report.messages().join("; ");
        return rejected(&summary, json!({ "success": false, "errors": report.to_json() }));
    }

    let frame = match convert_values(state.table(), &config).and_then(|record| state.codec.pack(&record)) {
        Ok(frame) => frame,
        Err(e) => {
            return rejected(
                e.code(),
                json!({ "success": false, "error": format!("Type conversion error: {}", e) }),
            )
        }
    };

    let host = request.host.unwrap_or_else(|| state.udp_host.clone());
    let port = request.port.unwrap_or(state.udp_port);
    let target = Endpoint::new(host, port);

    let response = match send_frame_async(&target, &frame).await {
        Ok(sent) => {
            log_event_with_fields(
                Event::ConfigSent,
                &[("bytes", &sent.to_string()), ("target", &target.authority())],
            );
            SendResponse {
                success: true,
                message: format!(
                    "Configuration sent successfully to {} ({} bytes)",
                    target.authority(),
                    sent
                ),
                bytes_sent: sent,
            }
        }
        Err(e) => {
            log_event_with_fields(
                Event::ConfigRejected,
                &[("code", e.code()), ("reason", &e.to_string()), ("target", &target.authority())],
            );
            SendResponse {
                success: false,
                message: format!("Error sending configuration: {}", e),
                bytes_sent: 0,
            }
        }
    };

    (StatusCode::OK, Json(json!(response)))
}
