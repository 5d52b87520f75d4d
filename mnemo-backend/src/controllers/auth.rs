//! Registration and login endpoints

use actix_web::{web, HttpResponse};

use crate::auth::{password, tokens};
use crate::errors::ApiError;
use crate::models::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::AppState;

/// One message for unknown email and wrong password alike, so responses
/// cannot be used to probe which emails are registered.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

async fn register(
    data: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    let password_input = body.password.as_deref().unwrap_or("");

    if name.is_empty() || email.is_empty() || password_input.is_empty() {
        return Err(ApiError::Validation("Missing fields".to_string()));
    }

    let existing = data
        .db
        .find_user_by_email(email)
        .map_err(|e| ApiError::internal("Registration failed", e))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let hash = password::hash_password(password_input)
        .map_err(|e| ApiError::internal("Registration failed", e))?;

    let user = match data.db.create_user(name, email, &hash) {
        Ok(user) => user,
        // The unique index can still race between the lookup and the insert
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
        Err(e) => return Err(ApiError::internal("Registration failed", e)),
    };

    let token = tokens::issue_token(&user.id, &data.jwt_secret)
        .map_err(|e| ApiError::internal("Registration failed", e))?;

    log::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: PublicUser::from(user),
    }))
}

async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    let password_input = body.password.as_deref().unwrap_or("");

    if email.is_empty() || password_input.is_empty() {
        return Err(ApiError::Validation("Missing fields".to_string()));
    }

    let user = data
        .db
        .find_user_by_email(email)
        .map_err(|e| ApiError::internal("Login failed", e))?
        .ok_or_else(|| ApiError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(password_input, &user.password_hash) {
        return Err(ApiError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let token = tokens::issue_token(&user.id, &data.jwt_secret)
        .map_err(|e| ApiError::internal("Login failed", e))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: PublicUser::from(user),
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login)),
    );
}
