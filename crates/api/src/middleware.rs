use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use hireboard_auth::TokenVerifier;
use hireboard_core::DomainError;

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Verify the bearer token and attach its [`hireboard_auth::Claims`] to the
/// request. Anything short of a valid token is a 401.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(unauthenticated)?;

    let claims = state.verifier.verify(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        unauthenticated()
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn unauthenticated() -> Response {
    errors::domain_error(DomainError::Unauthenticated)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
