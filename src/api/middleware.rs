/// Authentication middleware
use crate::{context::AppContext, error::AccountError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Require a valid session token and attach the account to the request
///
/// Short-circuits with 401 before the handler runs when the token is
/// absent, malformed, forged or expired.
pub async fn require_session(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Result<Response, AccountError> {
    let token = extract_bearer_token(req.headers()).ok_or_else(|| {
        AccountError::Unauthenticated("No token, authorization denied".to_string())
    })?;

    let account = ctx.session_tokens.verify(&token)?;
    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}
