//! Request middleware: trusted hosts and bearer authentication

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Authentication middleware
///
/// Resolves the access token to its user and inserts the [`User`] into the
/// request extensions.
///
/// [`User`]: crate::models::User
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;
    let user = state.user_service.authorize_access(&token).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Host name without any port, lowercased
fn host_name(host: &str) -> String {
    let name = match host.strip_prefix('[') {
        // IPv6 literal, e.g. `[::1]:8000`
        Some(rest) => rest.split(']').next().unwrap_or_default(),
        None => host.split(':').next().unwrap_or_default(),
    };
    name.to_ascii_lowercase()
}

/// Reject requests whose `Host` is not in the allow list
pub async fn trusted_host_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if state.allowed_hosts.iter().any(|h| h == "*") {
        return Ok(next.run(req).await);
    }

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().host())
        .map(host_name);

    match host {
        Some(host) if state.allowed_hosts.iter().any(|h| h.eq_ignore_ascii_case(&host)) => {
            Ok(next.run(req).await)
        }
        other => {
            warn!("Rejected request for untrusted host: {:?}", other);
            Err(ApiError::BadRequest("Invalid host header".to_string()))
        }
    }
}
