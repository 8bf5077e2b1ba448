use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::auth::AuthStudent;
use crate::db::{repository, schedules};
use crate::error::{AppError, is_unique_violation};
use crate::models::{AddSectionRequest, CreateScheduleRequest, Schedule, ScheduleWithSections};
use crate::state::AppState;

pub async fn list_schedules(
    State(state): State<AppState>,
    auth: AuthStudent,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let list = schedules::fetch_student_schedules(&state.db, auth.id).await?;
    Ok(Json(list))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    auth: AuthStudent,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    if req.schedule_name.trim().is_empty() {
        return Err(AppError::BadRequest("schedule_name is required".to_string()));
    }

    let schedule = schedules::insert_schedule(&state.db, auth.id, &req).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(id): Path<i64>,
) -> Result<Json<ScheduleWithSections>, AppError> {
    let schedule = schedules::fetch_schedule_with_sections(&state.db, id)
        .await?
        .ok_or_else(schedule_not_found)?;

    if schedule.schedule.student_id != auth.id {
        return Err(access_denied());
    }

    Ok(Json(schedule))
}

pub async fn add_section(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(id): Path<i64>,
    Json(req): Json<AddSectionRequest>,
) -> Result<Json<Value>, AppError> {
    owned_schedule(&state, auth.id, id).await?;

    repository::find_section_by_id(&state.db, req.section_id)
        .await?
        .ok_or_else(|| AppError::NotFound("section not found".to_string()))?;

    if let Some(meeting_id) = req.meeting_id {
        let meetings = repository::fetch_section_meetings(&state.db, req.section_id).await?;
        if !meetings.iter().any(|m| m.id == meeting_id) {
            return Err(AppError::BadRequest(
                "meeting does not belong to section".to_string(),
            ));
        }
    }

    schedules::add_section_to_schedule(&state.db, id, req.section_id, req.meeting_id)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("section already in schedule".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    Ok(Json(json!({ "message": "section added" })))
}

pub async fn remove_section(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path((id, section_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    owned_schedule(&state, auth.id, id).await?;

    let removed = schedules::remove_section_from_schedule(&state.db, id, section_id).await?;
    if !removed {
        return Err(AppError::NotFound("section not in schedule".to_string()));
    }

    Ok(Json(json!({ "message": "section removed" })))
}

async fn owned_schedule(state: &AppState, student_id: i64, id: i64) -> Result<Schedule, AppError> {
    let schedule = schedules::find_schedule_by_id(&state.db, id)
        .await?
        .ok_or_else(schedule_not_found)?;

    if schedule.student_id != student_id {
        return Err(access_denied());
    }

    Ok(schedule)
}

fn schedule_not_found() -> AppError {
    AppError::NotFound("schedule not found".to_string())
}

fn access_denied() -> AppError {
    AppError::Forbidden("access denied".to_string())
}
