//! Audit capture.
//!
//! Innermost middleware on auditable routes: snapshots the request body
//! (redacted, size-capped), runs the rest of the chain synchronously so the
//! measured latency covers the handler, then hands a finished record to the
//! audit queue. Enqueueing is non-blocking and persistence happens on the
//! worker pool, so neither a slow sink nor a client disconnect can affect the
//! response.

use std::time::Instant;

use axum::{
    body::{Body, to_bytes},
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use gatehouse_core::AppError;
use gatehouse_models::CurrentUser;
use gatehouse_models::audit::{AuditRecord, AuditStatus};

use crate::middleware::operation::RouteOperation;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

/// Bodies above this size are omitted from the record entirely. Truncating
/// instead would emit partial JSON.
const BODY_CAP: usize = 10 * 1024;

pub async fn audit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let operation = req
        .extensions()
        .get::<RouteOperation>()
        .map(|RouteOperation(op)| op.clone());
    let user = req.extensions().get::<CurrentUser>().cloned();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|RequestId(id)| id.clone());
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string());

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let ip_address = client_ip(&req);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let (req, body_snapshot) = snapshot_body(req).await;

    let start = Instant::now();
    let response = next.run(req).await;
    let latency = start.elapsed();

    // Only audited operations with an authenticated principal are recorded;
    // the response is returned unchanged either way.
    let (Some(operation), Some(user)) = (operation, user) else {
        return Ok(response);
    };
    let audited = state
        .registry
        .meta(&operation)
        .map(|meta| meta.audited)
        .unwrap_or(false);
    if !audited {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let meta = state.registry.meta(&operation);

    let mut details = json!({
        "method": method.as_str(),
        "path": path,
        "latency_ms": latency.as_millis() as u64,
    });
    if let Some(body) = body_snapshot {
        details["body"] = body;
    }

    state.audit.record(AuditRecord {
        id: Uuid::new_v4(),
        user_id: user.user_id,
        username: user.username,
        action: meta
            .map(|m| m.audit_action.clone())
            .unwrap_or_else(|| operation.action().to_string()),
        resource: meta
            .map(|m| m.category.clone())
            .unwrap_or_else(|| operation.resource().to_string()),
        resource_id: resource_id(matched_path.as_deref(), &path),
        ip_address,
        user_agent,
        details: Some(details),
        status: AuditStatus::from_http_status(status),
        request_id,
        operation: operation.as_str().to_string(),
        created_at: Utc::now(),
    });

    Ok(response)
}

fn client_ip(req: &Request) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string());
    forwarded.or_else(|| {
        req.headers()
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    })
}

/// Buffers a JSON body of at most [`BODY_CAP`] bytes and reconstructs the
/// request. Oversized and non-JSON bodies are omitted from the snapshot;
/// when the declared length already exceeds the cap the body passes through
/// unread.
async fn snapshot_body(req: Request) -> (Request, Option<Value>) {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if !is_json {
        return (req, None);
    }

    // A declared length over the cap skips buffering outright. Chunked and
    // unsized bodies carry no length; `to_bytes` bounds those below.
    let declared_len = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if let Some(length) = declared_len
        && (length == 0 || length > BODY_CAP)
    {
        return (req, None);
    }

    let (parts, body) = req.into_parts();
    match to_bytes(body, BODY_CAP).await {
        Ok(bytes) => {
            let snapshot = serde_json::from_slice::<Value>(&bytes).ok().map(|mut value| {
                redact(&mut value);
                value
            });
            (
                Request::from_parts(parts, Body::from(bytes)),
                snapshot,
            )
        }
        // The body is gone; the handler will see an empty one and reject the
        // request itself. Nothing to snapshot.
        Err(_) => (Request::from_parts(parts, Body::empty()), None),
    }
}

/// Recursively replaces the values of credential-looking fields.
fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                if is_sensitive(key) {
                    *entry = Value::String("[REDACTED]".to_string());
                } else {
                    redact(entry);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                redact(item);
            }
        }
        _ => {}
    }
}

fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("password") || key.contains("secret") || key.contains("token")
}

/// Derives the audited resource id: the path segment aligned with the
/// route's first `{param}`, falling back to the first purely numeric
/// segment.
fn resource_id(matched_path: Option<&str>, path: &str) -> Option<String> {
    let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if let Some(pattern) = matched_path {
        let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let param_idx = segments
            .iter()
            .position(|s| s.starts_with('{') && s.ends_with('}'));
        if let Some(idx) = param_idx
            && let Some(segment) = actual.get(idx)
        {
            return Some(segment.to_string());
        }
    }

    actual
        .iter()
        .find(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_nested_fields() {
        let mut body = json!({
            "username": "ada",
            "password": "hunter2",
            "profile": { "api_token": "abc", "bio": "hi" },
            "items": [{ "client_secret": "xyz" }]
        });
        redact(&mut body);

        assert_eq!(body["username"], "ada");
        assert_eq!(body["password"], "[REDACTED]");
        assert_eq!(body["profile"]["api_token"], "[REDACTED]");
        assert_eq!(body["profile"]["bio"], "hi");
        assert_eq!(body["items"][0]["client_secret"], "[REDACTED]");
    }

    #[test]
    fn test_resource_id_prefers_first_route_param() {
        assert_eq!(
            resource_id(
                Some("/api/orgs/{org_id}/teams/{team_id}/tasks"),
                "/api/orgs/5/teams/3/tasks"
            ),
            Some("5".to_string())
        );
        assert_eq!(
            resource_id(Some("/api/users/{user_id}"), "/api/users/42"),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_resource_id_falls_back_to_numeric_segment() {
        assert_eq!(
            resource_id(None, "/api/users/42/roles"),
            Some("42".to_string())
        );
        assert_eq!(resource_id(None, "/api/users"), None);
    }
}
