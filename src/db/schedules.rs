use sqlx::SqlitePool;

use crate::db::repository;
use crate::models::{CreateScheduleRequest, Schedule, ScheduleWithSections};

const SCHEDULE_COLUMNS: &str = "id, student_id, schedule_name, description, is_submitted, created_at";

pub async fn insert_schedule(
    db: &SqlitePool,
    student_id: i64,
    req: &CreateScheduleRequest,
) -> Result<Schedule, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(&format!(
        r#"
        INSERT INTO schedules (student_id, schedule_name, description)
        VALUES (?1, ?2, ?3)
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(&req.schedule_name)
    .bind(&req.description)
    .fetch_one(db)
    .await
}

pub async fn fetch_student_schedules(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Vec<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE student_id = ? \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn find_schedule_by_id(db: &SqlitePool, id: i64) -> Result<Option<Schedule>, sqlx::Error> {
    sqlx::query_as::<_, Schedule>(&format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Loads a schedule with every linked section expanded. Total credits count
/// each linked section's course credits once per section.
pub async fn fetch_schedule_with_sections(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<ScheduleWithSections>, sqlx::Error> {
    let Some(schedule) = find_schedule_by_id(db, id).await? else {
        return Ok(None);
    };

    let section_ids: Vec<i64> = sqlx::query_scalar(
        "SELECT section_id FROM schedule_sections WHERE schedule_id = ? ORDER BY added_at, id",
    )
    .bind(id)
    .fetch_all(db)
    .await?;

    let mut sections = Vec::with_capacity(section_ids.len());
    for section_id in section_ids {
        if let Some(section) = repository::find_section_details(db, section_id).await? {
            sections.push(section);
        }
    }

    let total_credits = sections.iter().map(|s| s.course.credits).sum();

    Ok(Some(ScheduleWithSections {
        schedule,
        sections,
        total_credits,
    }))
}

pub async fn add_section_to_schedule(
    db: &SqlitePool,
    schedule_id: i64,
    section_id: i64,
    meeting_id: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO schedule_sections (schedule_id, section_id, meeting_id) VALUES (?1, ?2, ?3)",
    )
    .bind(schedule_id)
    .bind(section_id)
    .bind(meeting_id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn remove_section_from_schedule(
    db: &SqlitePool,
    schedule_id: i64,
    section_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schedule_sections WHERE schedule_id = ?1 AND section_id = ?2")
        .bind(schedule_id)
        .bind(section_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
