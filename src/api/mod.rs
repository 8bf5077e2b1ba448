mod courses;
mod schedules;
mod students;

use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, post};
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api = Router::new()
        .route("/health", get(health))
        .route("/courses", get(courses::list_courses))
        .route("/courses/{id}", get(courses::get_course))
        .route("/courses/{id}/sections", get(courses::list_course_sections))
        .route("/auth/register", post(students::register))
        .route("/auth/login", post(students::login))
        .route("/users/me", get(students::current_student))
        .route(
            "/schedules",
            get(schedules::list_schedules).post(schedules::create_schedule),
        )
        .route("/schedules/{id}", get(schedules::get_schedule))
        .route("/schedules/{id}/sections", post(schedules::add_section))
        .route(
            "/schedules/{id}/sections/{section_id}",
            delete(schedules::remove_section),
        );

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_LENGTH, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(86400));

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(Json(json!({ "status": "ok" })))
}
