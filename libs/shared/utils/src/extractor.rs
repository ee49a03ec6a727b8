use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_models::auth::AuthPayload;
use shared_models::error::AppError;

use crate::state::AppState;

/// Pull the token out of an `Authorization` header value. The scheme is
/// matched case-insensitively and anything other than `Bearer <token>` is
/// rejected.
pub fn parse_bearer_header(value: &str) -> Result<&str, AppError> {
    let mut fields = value.split_whitespace();
    let scheme = fields
        .next()
        .ok_or_else(|| AppError::Unauthenticated("invalid authorization header".to_string()))?;
    let token = fields
        .next()
        .ok_or_else(|| AppError::Unauthenticated("invalid authorization header".to_string()))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthenticated(format!(
            "unsupported authorization type {scheme}"
        )));
    }
    Ok(token)
}

/// Authentication middleware: verifies the bearer token and attaches the
/// resulting identity to the request extensions. Role and ownership checks
/// happen later, inside each service operation.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| {
            AppError::Unauthenticated("authorization header is not provided".to_string())
        })?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("invalid authorization header".to_string()))?;

    let token = parse_bearer_header(header)?;
    let payload = state.tokens.verify_token(token)?;
    debug!("authenticated {} ({})", payload.username, payload.role);

    request.extensions_mut().insert(payload);
    Ok(next.run(request).await)
}
