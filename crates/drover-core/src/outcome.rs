//! Normalized CKAN API outcomes.
//!
//! Every CKAN action call is wrapped into an [`Outcome`] immediately after
//! the transport returns. The portal signals success with
//! `{"success": true, "result": ...}` and failure with either
//! `{"success": false, "error": {...}}` or a non-2xx status; this module
//! folds all of those shapes (plus unparsable bodies and transport-level
//! failures) into one tagged value with a best-effort human-readable
//! message.

use serde_json::{json, Value};
use tracing::{info, warn};

/// What the HTTP transport seam yields: status code plus raw body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A normalized CKAN API outcome.
///
/// `Success` carries the body's `result` payload. `Failure` carries a
/// best-effort diagnostic, usually `{"message": ...}`; a CKAN validation
/// error is kept structured. A `Failure` without a status code means no
/// HTTP exchange took place (see [`Outcome::none`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { status_code: u16, result: Value },
    Failure { status_code: Option<u16>, result: Value },
}

/// Truthiness in the CKAN body sense: absent, null, false, zero, and empty
/// strings/arrays/objects all count as false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl Outcome {
    /// The terminal no-call outcome: no request was made (or an operation
    /// sequence finished without a final response to report).
    pub fn none() -> Self {
        let outcome = Outcome::Failure {
            status_code: None,
            result: json!({ "result": null }),
        };
        outcome.log();
        outcome
    }

    /// A failure outcome for a transport-level error (connect, timeout,
    /// unreadable body). Remote failures are never raised as errors.
    pub fn from_error(message: impl Into<String>) -> Self {
        let outcome = Outcome::Failure {
            status_code: None,
            result: json!({ "message": message.into() }),
        };
        outcome.log();
        outcome
    }

    /// Normalizes a raw HTTP response.
    ///
    /// Success is declared iff the status is 2xx and the parsed body carries
    /// a truthy `success` field; the outcome then narrows to the body's
    /// `result`. On the failure path, 503 and 403 map to literal messages,
    /// and otherwise the body's `error` object is mined in priority order:
    /// `name` (last element when it is a list), `id`, `message`, or the
    /// whole object when `__type` is `"Validation Error"`.
    pub fn from_raw(raw: &RawResponse) -> Self {
        let mut result = match serde_json::from_str::<Value>(&raw.body) {
            Ok(value) => value,
            Err(e) => json!({
                "message": format!("{}: {}", e, raw.body.replace('\n', " "))
            }),
        };

        let http_ok = (200..300).contains(&raw.status);
        let success = result.get("success").map(truthy).unwrap_or(false);

        if http_ok && success {
            let outcome = Outcome::Success {
                status_code: raw.status,
                result: result.get("result").cloned().unwrap_or(Value::Null),
            };
            outcome.log();
            return outcome;
        }

        if raw.status == 503 {
            result = Value::String("Service unavailable".to_string());
        }
        if raw.status == 403 {
            result = Value::String("Forbidden".to_string());
        }

        if let Some(err) = result.get("error").and_then(Value::as_object).cloned() {
            if err.get("name").map(truthy).unwrap_or(false) {
                result = match &err["name"] {
                    Value::Array(items) => items.last().cloned().unwrap_or(Value::Null),
                    other => other.clone(),
                };
            } else if err.get("id").map(truthy).unwrap_or(false) {
                result = err["id"].clone();
            } else if err.get("message").map(truthy).unwrap_or(false) {
                result = err["message"].clone();
            } else if err.get("__type").and_then(Value::as_str) == Some("Validation Error") {
                result = Value::Object(err);
            }
        }

        if let Value::String(message) = result {
            result = json!({ "message": message });
        }

        let outcome = Outcome::Failure {
            status_code: Some(raw.status),
            result,
        };
        outcome.log();
        outcome
    }

    pub fn ok(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn status(&self) -> &'static str {
        if self.ok() {
            "OK"
        } else {
            "not OK"
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Outcome::Success { status_code, .. } => Some(*status_code),
            Outcome::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn result(&self) -> &Value {
        match self {
            Outcome::Success { result, .. } | Outcome::Failure { result, .. } => result,
        }
    }

    pub fn into_result(self) -> Value {
        match self {
            Outcome::Success { result, .. } | Outcome::Failure { result, .. } => result,
        }
    }

    /// The `message` field of the result, when present.
    pub fn message(&self) -> Option<&str> {
        self.result().get("message").and_then(Value::as_str)
    }

    fn log(&self) {
        let code = match self.status_code() {
            Some(code) => code.to_string(),
            None => "none".to_string(),
        };
        if self.ok() {
            info!("Response {} {}", code, self.status());
        } else {
            warn!(
                "Response {} {}: {}",
                code,
                self.status(),
                serde_json::to_string(self.result()).unwrap_or_default()
            );
        }
    }
}
