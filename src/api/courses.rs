use axum::Json;
use axum::extract::{Path, Query, State};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Course, CourseQueryParams, SectionWithDetails};
use crate::state::AppState;

pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let semester = params.semester.as_deref().filter(|s| !s.is_empty());
    let courses = repository::fetch_courses(&state.db, semester).await?;
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = repository::find_course_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".to_string()))?;
    Ok(Json(course))
}

pub async fn list_course_sections(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SectionWithDetails>>, AppError> {
    let sections = repository::fetch_sections_for_course(&state.db, id).await?;
    Ok(Json(sections))
}
