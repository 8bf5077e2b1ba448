use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::auth::{self, AuthStudent};
use crate::db::students;
use crate::error::{AppError, is_unique_violation};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, Student};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_registration(&req, &state.config.email_domain)?;

    let password_hash = auth::hash_password(&req.password, state.config.bcrypt_cost)?;
    let student = students::insert_student(&state.db, &req, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("email or student id already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    let token = auth::generate_token(&state.config, student.id, &student.email)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, student })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let student = students::find_student_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("no student found with such email".to_string()))?;

    if !auth::verify_password(&req.password, &student.password_hash) {
        return Err(AppError::Unauthorized("wrong password".to_string()));
    }

    let token = auth::generate_token(&state.config, student.id, &student.email)?;
    Ok(Json(AuthResponse { token, student }))
}

pub async fn current_student(
    State(state): State<AppState>,
    auth: AuthStudent,
) -> Result<Json<Student>, AppError> {
    let student = students::find_student_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("student not found".to_string()))?;
    Ok(Json(student))
}

fn validate_registration(req: &RegisterRequest, email_domain: &str) -> Result<(), AppError> {
    let required = [
        ("email", &req.email),
        ("first_name", &req.first_name),
        ("last_name", &req.last_name),
        ("student_id", &req.student_id),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{} is required", field)));
        }
    }

    let suffix = format!("@{}", email_domain);
    let local = req.email.strip_suffix(suffix.as_str()).unwrap_or_default();
    if local.is_empty() || local.contains('@') {
        return Err(AppError::BadRequest("invalid email format".to_string()));
    }

    if req.password.chars().count() < 8 {
        return Err(AppError::BadRequest(
            "password must be at least 8 characters long".to_string(),
        ));
    }

    if !(1..=5).contains(&req.year_of_study) {
        return Err(AppError::BadRequest(
            "year_of_study must be between 1 and 5".to_string(),
        ));
    }

    Ok(())
}
