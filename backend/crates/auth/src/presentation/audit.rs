//! Audit Attributor
//!
//! Runs behind the auth gate and rewrites JSON bodies of mutating requests
//! so `createdBy`, `updatedBy` and `userId` come from the principal:
//!
//! - `POST`: `createdBy` and `updatedBy` are overwritten; `userId` is
//!   filled in only when the client left it out (or sent null / "").
//! - `PUT` / `PATCH`: `updatedBy` is overwritten; nothing else changes.
//! - anything else passes through untouched.
//!
//! Attribution is best-effort. When a body cannot be rewritten the request
//! continues unchanged and the reason is logged. The one exception is a
//! streamed body that cannot be read in full (no `Content-Length`, more
//! than `MAX_ATTRIBUTED_BODY_BYTES`): it is answered with 413, since the
//! bytes already consumed cannot be handed on.

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::audit::{CREATED_BY_FIELD, OWNER_FIELD, UPDATED_BY_FIELD};
use kernel::error::app_error::AppError;
use kernel::id::UserId;
use serde_json::Value;
use thiserror::Error;

use crate::presentation::middleware::Principal;

/// Bodies larger than this are forwarded without attribution
pub const MAX_ATTRIBUTED_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::POST => Some(AuditAction::Create),
            Method::PUT | Method::PATCH => Some(AuditAction::Update),
            _ => None,
        }
    }
}

/// Why a body was left unattributed
#[derive(Debug, Error)]
pub enum AttributionFailure {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body is not a JSON object")]
    NotAnObject,

    #[error("request body exceeds {} bytes", MAX_ATTRIBUTED_BODY_BYTES)]
    TooLarge,

    #[error("request body could not be read: {0}")]
    Unreadable(String),
}

/// Stamp audit fields for `user` into a JSON object body
pub fn stamp_body(
    body: &[u8],
    user: UserId,
    action: AuditAction,
) -> Result<Vec<u8>, AttributionFailure> {
    // A missing body is stamped as an empty object
    let mut value: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(body)?
    };
    let object = value.as_object_mut().ok_or(AttributionFailure::NotAnObject)?;
    let user = Value::String(user.to_string());

    match action {
        AuditAction::Create => {
            object.insert(CREATED_BY_FIELD.to_string(), user.clone());
            object.insert(UPDATED_BY_FIELD.to_string(), user.clone());

            let owner_missing = match object.get(OWNER_FIELD) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if owner_missing {
                object.insert(OWNER_FIELD.to_string(), user);
            }
        }
        AuditAction::Update => {
            object.insert(UPDATED_BY_FIELD.to_string(), user);
        }
    }

    Ok(serde_json::to_vec(&value)?)
}

/// Middleware entry point; layer it inside the auth gate
pub async fn attribute_audit_fields(req: Request, next: Next) -> Response {
    let Some(principal) = req.extensions().get::<Principal>().cloned() else {
        return next.run(req).await;
    };
    let Some(action) = AuditAction::from_method(req.method()) else {
        return next.run(req).await;
    };

    match attribute(req, principal.user_id(), action).await {
        Ok(req) => next.run(req).await,
        Err(rejection) => rejection,
    }
}

async fn attribute(req: Request, user: UserId, action: AuditAction) -> Result<Request, Response> {
    let declared_len = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > MAX_ATTRIBUTED_BODY_BYTES) {
        log_skipped(&req, user, &AttributionFailure::TooLarge);
        return Ok(req);
    }

    let (mut parts, body) = req.into_parts();
    let bytes: Bytes = match to_bytes(body, MAX_ATTRIBUTED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                user_id = %user,
                method = %parts.method,
                path = %parts.uri.path(),
                reason = %AttributionFailure::Unreadable(e.to_string()),
                "Request body rejected before attribution"
            );
            return Err(AppError::payload_too_large(format!(
                "Request body must not exceed {MAX_ATTRIBUTED_BODY_BYTES} bytes"
            ))
            .into_response());
        }
    };

    match stamp_body(&bytes, user, action) {
        Ok(stamped) => {
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(stamped.len()));
            Ok(Request::from_parts(parts, Body::from(stamped)))
        }
        Err(failure) => {
            let req = Request::from_parts(parts, Body::from(bytes));
            log_skipped(&req, user, &failure);
            Ok(req)
        }
    }
}

fn log_skipped(req: &Request, user: UserId, failure: &AttributionFailure) {
    tracing::warn!(
        user_id = %user,
        method = %req.method(),
        path = %req.uri().path(),
        reason = %failure,
        "Audit attribution skipped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::IdentityClaim;
    use axum::Router;
    use axum::Json;
    use axum::middleware;
    use axum::routing::post;
    use serde_json::json;
    use tower::ServiceExt;

    fn stamp(body: Value, user: UserId, action: AuditAction) -> Value {
        let bytes = serde_json::to_vec(&body).unwrap();
        serde_json::from_slice(&stamp_body(&bytes, user, action).unwrap()).unwrap()
    }

    #[test]
    fn test_create_overwrites_audit_fields() {
        let user = UserId::new();
        let forged = UserId::new();

        let body = stamp(
            json!({ "amount": 50, "createdBy": forged.to_string(), "updatedBy": forged.to_string() }),
            user,
            AuditAction::Create,
        );

        assert_eq!(body["createdBy"], user.to_string());
        assert_eq!(body["updatedBy"], user.to_string());
        assert_eq!(body["userId"], user.to_string());
        assert_eq!(body["amount"], 50);
    }

    #[test]
    fn test_create_keeps_explicit_owner() {
        let user = UserId::new();
        let owner = UserId::new();

        let body = stamp(json!({ "userId": owner.to_string() }), user, AuditAction::Create);
        assert_eq!(body["userId"], owner.to_string());
        assert_eq!(body["createdBy"], user.to_string());

        let body = stamp(json!({ "userId": null }), user, AuditAction::Create);
        assert_eq!(body["userId"], user.to_string());

        let body = stamp(json!({ "userId": "" }), user, AuditAction::Create);
        assert_eq!(body["userId"], user.to_string());
    }

    #[test]
    fn test_update_only_touches_updated_by() {
        let creator = UserId::new();
        let editor = UserId::new();

        let body = stamp(
            json!({ "createdBy": creator.to_string(), "note": "fix" }),
            editor,
            AuditAction::Update,
        );

        assert_eq!(body["updatedBy"], editor.to_string());
        assert_eq!(body["createdBy"], creator.to_string());
        assert!(body.get("userId").is_none());
    }

    #[test]
    fn test_empty_body_becomes_object() {
        let user = UserId::new();
        let stamped = stamp_body(b"", user, AuditAction::Create).unwrap();
        let body: Value = serde_json::from_slice(&stamped).unwrap();
        assert_eq!(body["createdBy"], user.to_string());
        assert_eq!(body["userId"], user.to_string());
    }

    #[test]
    fn test_unstampable_bodies() {
        let user = UserId::new();
        assert!(matches!(
            stamp_body(b"[1,2]", user, AuditAction::Create),
            Err(AttributionFailure::NotAnObject)
        ));
        assert!(matches!(
            stamp_body(b"{nope", user, AuditAction::Create),
            Err(AttributionFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_methods() {
        assert_eq!(AuditAction::from_method(&Method::POST), Some(AuditAction::Create));
        assert_eq!(AuditAction::from_method(&Method::PATCH), Some(AuditAction::Update));
        assert_eq!(AuditAction::from_method(&Method::GET), None);
        assert_eq!(AuditAction::from_method(&Method::DELETE), None);
    }

    /// Echo handler behind the attributor, with a principal injected
    fn app(principal: Option<UserId>) -> Router {
        Router::new()
            .route(
                "/echo",
                post(|Json(body): Json<Value>| async move { Json(body) })
                    .put(|Json(body): Json<Value>| async move { Json(body) }),
            )
            .layer(middleware::from_fn(attribute_audit_fields))
            .layer(middleware::from_fn(move |mut req: Request, next: Next| async move {
                if let Some(user) = principal {
                    req.extensions_mut().insert(Principal(IdentityClaim::new(
                        user,
                        "alice",
                        "alice@x.com",
                    )));
                }
                next.run(req).await
            }))
    }

    async fn send(app: Router, method: Method, body: &str) -> (u16, Bytes) {
        let request = Request::builder()
            .method(method)
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        (status, to_bytes(response.into_body(), usize::MAX).await.unwrap())
    }

    #[tokio::test]
    async fn test_middleware_stamps_body_before_handler() {
        let user = UserId::new();
        let (status, body) = send(app(Some(user)), Method::POST, r#"{"amount":50}"#).await;

        assert_eq!(status, 200);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["createdBy"], user.to_string());
        assert_eq!(body["userId"], user.to_string());
    }

    #[tokio::test]
    async fn test_without_principal_passes_through() {
        let (_, body) = send(app(None), Method::POST, r#"{"createdBy":"client"}"#).await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "createdBy": "client" }));
    }

    #[tokio::test]
    async fn test_oversized_streamed_body_is_rejected() {
        let body = format!(r#"{{"note":"{}"}}"#, "a".repeat(MAX_ATTRIBUTED_BODY_BYTES));
        let (status, body) = send(app(Some(UserId::new())), Method::POST, &body).await;

        assert_eq!(status, 413);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], 413);
    }

    #[tokio::test]
    async fn test_non_object_body_is_forwarded_unchanged() {
        let (status, body) = send(app(Some(UserId::new())), Method::PUT, "[1,2,3]").await;
        assert_eq!(status, 200);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!([1, 2, 3]));
    }
}
