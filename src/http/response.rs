//! Normalized response shape.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which the HTTP status is reported.
pub const HTTP_CODE_KEY: &str = "http_code";

/// How a response body is turned into an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// 2xx other than 204: the body is a JSON object.
    Json,
    /// 204: there is no body to decode.
    NoContent,
    /// Everything else: only the status is reported.
    StatusOnly,
}

impl ResponseKind {
    pub fn classify(status: StatusCode) -> Self {
        if status == StatusCode::NO_CONTENT {
            ResponseKind::NoContent
        } else if status.is_success() {
            ResponseKind::Json
        } else {
            ResponseKind::StatusOnly
        }
    }
}

/// Decoded payload plus the status code it arrived with.
///
/// Serializes as one flat object, e.g. `{"id": "abc", "http_code": 200}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    pub http_code: u16,
}

impl ResponseEnvelope {
    /// Envelope carrying nothing but the status.
    pub fn status_only(http_code: u16) -> Self {
        Self {
            payload: Map::new(),
            http_code,
        }
    }

    /// Decodes a JSON object body. A `http_code` key in the body is replaced
    /// by the real status.
    pub fn from_json_body(http_code: u16, body: &[u8]) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(body).context("Failed to parse JSON response from Zoom API")?;

        let mut payload = match value {
            Value::Object(map) => map,
            other => anyhow::bail!(
                "Expected a JSON object from Zoom API, got {}",
                json_type_name(&other)
            ),
        };
        payload.remove(HTTP_CODE_KEY);

        Ok(Self { payload, http_code })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_code)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == HTTP_CODE_KEY {
            return None;
        }
        self.payload.get(key)
    }

    /// Flattens into a single JSON object including `http_code`.
    pub fn into_value(self) -> Value {
        let mut map = self.payload;
        map.insert(HTTP_CODE_KEY.to_string(), Value::from(self.http_code));
        Value::Object(map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
