use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

fn secret(config: &AppConfig) -> Result<&[u8], AppError> {
    config
        .jwt_secret
        .as_deref()
        .map(str::as_bytes)
        .ok_or_else(|| AppError::Internal("JWT_SECRET not set".to_string()))
}

pub fn generate_token(config: &AppConfig, user_id: i64, email: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.jwt_expiry_hours)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret(config)?),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
}

pub fn validate_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret(config)?),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("token has expired".to_string())
        }
        _ => AppError::Unauthorized("invalid token".to_string()),
    })?;

    Ok(data.claims)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// The student behind a valid `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthStudent {
    pub id: i64,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthStudent {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("unauthorized".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("invalid token".to_string()))?;

        let claims = validate_token(&state.config, token)?;

        Ok(AuthStudent {
            id: claims.user_id,
            email: claims.email,
        })
    }
}
