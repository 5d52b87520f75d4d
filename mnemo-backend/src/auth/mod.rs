//! Authentication: Argon2id password hashing, signed bearer tokens, and the
//! request guard used by the note endpoints.

pub mod password;
pub mod tokens;

use actix_web::HttpRequest;

use crate::errors::ApiError;

/// Extract and verify the bearer token from the Authorization header,
/// yielding the caller's user id for downstream ownership checks.
pub fn require_user(req: &HttpRequest, secret: &str) -> Result<String, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Auth("Missing token".to_string()))?;

    let claims = tokens::verify_token(token, secret)
        .map_err(|_| ApiError::Auth("Invalid token".to_string()))?;

    Ok(claims.sub)
}
