//! HTTP client utilities.
//!
//! Provides the shared HTTP client used by both gateway clients, plus the
//! envelope inspection that turns a gateway answer into success or a
//! [`CommdashError::RemoteRejection`].

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response, Url};
use serde_json::Value;

use crate::error::{CommdashError, Result};

/// Upper bound accepted for a configured request timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// `status` values that mark a failed request.
const FAILURE_STATUSES: &[&str] = &["error", "failed", "failure", "fail"];

/// `code` values that mark a successful request.
const SUCCESS_CODES: &[&str] = &["0", "200", "success", "ok"];

/// Fields searched, in order, for a remote-supplied message.
const MESSAGE_FIELDS: &[&str] = &["message", "reason", "error", "errorMessage"];

/// Build a configured HTTP client.
///
/// `timeout` of `None` leaves the request without a client-side deadline.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder =
        ClientBuilder::new().user_agent(format!("commdash/{}", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| CommdashError::Config(format!("failed to build HTTP client: {e}")))
}

/// Get a client without a timeout.
pub fn default_client() -> Result<Client> {
    build_client(None)
}

/// Join path segments onto a gateway base URL.
///
/// Segments are percent-encoded, so identifiers can be passed through as-is.
///
/// # Errors
///
/// Returns `Config` if the base URL is not an absolute http(s) URL.
pub fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CommdashError::Config(format!("invalid gateway URL '{base_url}': {e}")))?;
    {
        let mut path = url.path_segments_mut().map_err(|()| {
            CommdashError::Config(format!("gateway URL '{base_url}' cannot take a path"))
        })?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Read a gateway response body as JSON, rejecting non-2xx statuses.
///
/// The rejection carries the remote message when one is present. A 2xx body
/// that is not JSON is returned as a JSON string.
///
/// # Errors
///
/// Returns `Transport` if the body cannot be read, `RemoteRejection` for a
/// non-2xx status.
pub async fn read_json(response: Response, context: &str) -> Result<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CommdashError::transport(context, &e))?;

    let payload = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));

    if !status.is_success() {
        let message = remote_message(&payload).unwrap_or_else(|| format!("HTTP {status}"));
        tracing::warn!(context, status = status.as_u16(), %message, "Gateway returned HTTP error");
        return Err(CommdashError::rejected(context, Some(status.as_u16()), message));
    }

    Ok(payload)
}

/// Read a gateway response and unwrap its JSON envelope.
///
/// Like [`read_json`], but a 2xx failure envelope is also a rejection.
///
/// # Errors
///
/// Returns `Transport` if the body cannot be read, `RemoteRejection` if the
/// gateway reported a failure.
pub async fn read_envelope(response: Response, context: &str) -> Result<Value> {
    let status = response.status().as_u16();
    let payload = read_json(response, context).await?;

    if let Some(message) = envelope_failure(&payload) {
        tracing::warn!(context, %message, "Gateway rejected request");
        return Err(CommdashError::rejected(context, Some(status), message));
    }

    Ok(payload)
}

/// Inspect a successful-status payload for a failure envelope.
///
/// Returns the best available message when the envelope reports a failure.
#[must_use]
pub fn envelope_failure(payload: &Value) -> Option<String> {
    let Value::Object(map) = payload else {
        return None;
    };

    let failed_status = map
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| FAILURE_STATUSES.contains(&s.trim().to_lowercase().as_str()));

    let failed_code = has_failure_code(map);

    let has_error = map.get("error").is_some_and(|e| !e.is_null());

    if failed_status || failed_code || has_error {
        Some(remote_message(payload).unwrap_or_else(|| "request rejected by gateway".to_string()))
    } else {
        None
    }
}

/// Inspect a payload for a non-success `code`/`errorCode` only.
///
/// Unlike [`envelope_failure`], a `status` or `error` field is ignored, so
/// records that carry their own delivery outcome pass.
#[must_use]
pub fn code_failure(payload: &Value) -> Option<String> {
    let map = payload.as_object()?;
    has_failure_code(map)
        .then(|| remote_message(payload).unwrap_or_else(|| "request rejected by gateway".to_string()))
}

fn has_failure_code(map: &serde_json::Map<String, Value>) -> bool {
    ["code", "errorCode"]
        .iter()
        .filter_map(|key| map.get(*key))
        .any(|code| !is_success_code(code))
}

fn is_success_code(code: &Value) -> bool {
    match code {
        Value::Null => true,
        Value::Number(n) => n.as_i64().is_some_and(|n| n == 0 || n == 200),
        Value::String(s) => SUCCESS_CODES.contains(&s.trim().to_lowercase().as_str()),
        _ => false,
    }
}

/// Extract a remote-supplied message from a payload, if any.
#[must_use]
pub fn remote_message(payload: &Value) -> Option<String> {
    let map = payload.as_object()?;
    for field in MESSAGE_FIELDS {
        match map.get(*field) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Object(inner)) => {
                if let Some(Value::String(s)) = inner.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }
    None
}
