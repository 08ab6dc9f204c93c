//! Business envelope and raw transport response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

// == Api Response ==
/// The `{code, data, message}` envelope every endpoint answers with.
///
/// `code == 0` means success; anything else is an application error even
/// when the HTTP status was 2xx.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    pub data: T,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            data,
            message: "ok".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl ApiResponse<Value> {
    /// Builds a failure envelope with no data.
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            data: Value::Null,
            message: message.into(),
        }
    }

    /// Validates and parses a response body.
    ///
    /// The body must be a JSON object whose `code` is an integer. `message`
    /// must be a string when present; a missing `data` is read as null.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ClientError::MalformedEnvelope(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(ClientError::MalformedEnvelope(
                "body is not a JSON object".to_string(),
            ));
        };

        let code = object
            .get("code")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                ClientError::MalformedEnvelope("missing or non-integer `code`".to_string())
            })?;

        let message = match object.remove("message") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(_) => {
                return Err(ClientError::MalformedEnvelope(
                    "`message` is not a string".to_string(),
                ))
            }
        };

        let data = object.remove("data").unwrap_or(Value::Null);

        Ok(Self {
            code,
            data,
            message,
        })
    }

    /// Splits the envelope into its payload, or a business error for `code != 0`.
    pub fn into_result(self) -> Result<Value> {
        if self.code != 0 {
            let data = (!self.data.is_null()).then_some(self.data);
            return Err(ClientError::business(self.code, self.message, data));
        }
        Ok(self.data)
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("code".to_string(), Value::from(self.code));
        object.insert("data".to_string(), self.data.clone());
        object.insert("message".to_string(), Value::from(self.message.clone()));
        Value::Object(object)
    }
}

// == Raw Response ==
/// What a transport hands back: status and undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response whose body is `value` serialized as JSON.
    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// A 200 response carrying a `{code, data, message}` envelope.
    pub fn envelope(code: i64, data: Value, message: &str) -> Self {
        let envelope = ApiResponse {
            code,
            data,
            message: message.to_string(),
        };
        Self::json(200, &envelope.to_value())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort JSON view of the body, used for error details.
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}
