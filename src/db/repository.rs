use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{Course, CourseSummary, Professor, Section, SectionMeeting, SectionWithDetails};

const COURSE_COLUMNS: &str =
    "id, course_code, course_name, credits, is_internship, description, semester, created_at";

pub struct CourseUpsert<'a> {
    pub course_code: &'a str,
    pub course_name: &'a str,
    pub credits: i64,
    pub semester: &'a str,
    pub is_internship: bool,
}

pub struct ProfessorUpsert<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

pub struct SectionUpsert<'a> {
    pub course_id: i64,
    pub section_number: &'a str,
    pub section_type: &'a str,
    pub professor_id: Option<i64>,
    pub total_seats: i64,
}

pub struct MeetingInsert<'a> {
    pub section_id: i64,
    pub day_of_week: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub room: Option<&'a str>,
    pub building: Option<&'a str>,
}

pub async fn fetch_courses(
    db: &SqlitePool,
    semester: Option<&str>,
) -> Result<Vec<Course>, sqlx::Error> {
    match semester {
        Some(semester) => {
            sqlx::query_as::<_, Course>(&format!(
                "SELECT {COURSE_COLUMNS} FROM courses WHERE semester = ? ORDER BY course_code"
            ))
            .bind(semester)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, Course>(&format!(
                "SELECT {COURSE_COLUMNS} FROM courses ORDER BY semester DESC, course_code"
            ))
            .fetch_all(db)
            .await
        }
    }
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn count_courses(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(db)
        .await
}

const SECTION_DETAILS_SELECT: &str = r#"
    SELECT
        s.id, s.course_id, s.section_number, s.section_type,
        s.professor_id, s.total_seats, s.available_seats, s.parent_section_id,
        c.course_code, c.course_name, c.credits,
        p.first_name, p.last_name, p.email, p.rating
    FROM sections s
    JOIN courses c ON s.course_id = c.id
    LEFT JOIN professors p ON s.professor_id = p.id
"#;

type SectionParts = (Section, CourseSummary, Option<Professor>);

pub async fn fetch_sections_for_course(
    db: &SqlitePool,
    course_id: i64,
) -> Result<Vec<SectionWithDetails>, sqlx::Error> {
    let parts = sqlx::query(&format!(
        "{SECTION_DETAILS_SELECT} WHERE s.course_id = ? ORDER BY s.section_type, s.section_number"
    ))
    .bind(course_id)
    .try_map(|row: SqliteRow| section_parts(&row))
    .fetch_all(db)
    .await?;

    let mut sections = Vec::with_capacity(parts.len());
    for part in parts {
        sections.push(with_meetings(db, part).await?);
    }

    Ok(sections)
}

pub async fn find_section_details(
    db: &SqlitePool,
    section_id: i64,
) -> Result<Option<SectionWithDetails>, sqlx::Error> {
    let part = sqlx::query(&format!("{SECTION_DETAILS_SELECT} WHERE s.id = ?"))
        .bind(section_id)
        .try_map(|row: SqliteRow| section_parts(&row))
        .fetch_optional(db)
        .await?;

    match part {
        Some(part) => Ok(Some(with_meetings(db, part).await?)),
        None => Ok(None),
    }
}

fn section_parts(row: &SqliteRow) -> Result<SectionParts, sqlx::Error> {
    let section = Section {
        id: row.try_get("id")?,
        course_id: row.try_get("course_id")?,
        section_number: row.try_get("section_number")?,
        section_type: row.try_get("section_type")?,
        professor_id: row.try_get("professor_id")?,
        total_seats: row.try_get("total_seats")?,
        available_seats: row.try_get("available_seats")?,
        parent_section_id: row.try_get("parent_section_id")?,
    };
    let course = CourseSummary {
        id: section.course_id,
        course_code: row.try_get("course_code")?,
        course_name: row.try_get("course_name")?,
        credits: row.try_get("credits")?,
    };
    let professor = match section.professor_id {
        Some(id) => Some(Professor {
            id,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            rating: row.try_get("rating")?,
        }),
        None => None,
    };

    Ok((section, course, professor))
}

async fn with_meetings(
    db: &SqlitePool,
    (section, course, professor): SectionParts,
) -> Result<SectionWithDetails, sqlx::Error> {
    let meetings = fetch_section_meetings(db, section.id).await?;

    Ok(SectionWithDetails {
        section,
        course,
        professor,
        meetings,
    })
}

pub async fn find_section_by_id(db: &SqlitePool, id: i64) -> Result<Option<Section>, sqlx::Error> {
    sqlx::query_as::<_, Section>(
        r#"
        SELECT id, course_id, section_number, section_type, professor_id,
               total_seats, available_seats, parent_section_id
        FROM sections
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn fetch_section_meetings(
    db: &SqlitePool,
    section_id: i64,
) -> Result<Vec<SectionMeeting>, sqlx::Error> {
    sqlx::query_as::<_, SectionMeeting>(
        r#"
        SELECT id, section_id, day_of_week, start_time, end_time, room, building
        FROM section_meetings
        WHERE section_id = ?
        ORDER BY
            CASE day_of_week
                WHEN 'Monday' THEN 1
                WHEN 'Tuesday' THEN 2
                WHEN 'Wednesday' THEN 3
                WHEN 'Thursday' THEN 4
                WHEN 'Friday' THEN 5
                WHEN 'Saturday' THEN 6
                WHEN 'Sunday' THEN 7
            END,
            start_time
        "#,
    )
    .bind(section_id)
    .fetch_all(db)
    .await
}

/// Inserts a course or, when the code already exists for the semester,
/// refreshes its title and internship flag. Credits are left untouched.
pub async fn upsert_course(db: &SqlitePool, course: &CourseUpsert<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO courses (course_code, course_name, credits, semester, is_internship)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (course_code, semester) DO UPDATE
        SET course_name = excluded.course_name,
            is_internship = excluded.is_internship
        RETURNING id
        "#,
    )
    .bind(course.course_code)
    .bind(course.course_name)
    .bind(course.credits)
    .bind(course.semester)
    .bind(course.is_internship)
    .fetch_one(db)
    .await
}

pub async fn upsert_professor(
    db: &SqlitePool,
    professor: &ProfessorUpsert<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO professors (first_name, last_name, email)
        VALUES (?1, ?2, ?3)
        ON CONFLICT (email) DO UPDATE
        SET first_name = excluded.first_name
        RETURNING id
        "#,
    )
    .bind(professor.first_name)
    .bind(professor.last_name)
    .bind(professor.email)
    .fetch_one(db)
    .await
}

/// Inserts a section with all seats available. On conflict only the seat
/// total changes; type and professor stay as first written.
pub async fn upsert_section(
    db: &SqlitePool,
    section: &SectionUpsert<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO sections
            (course_id, section_number, section_type, professor_id, total_seats, available_seats)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        ON CONFLICT (course_id, section_number) DO UPDATE
        SET total_seats = excluded.total_seats
        RETURNING id
        "#,
    )
    .bind(section.course_id)
    .bind(section.section_number)
    .bind(section.section_type)
    .bind(section.professor_id)
    .bind(section.total_seats)
    .fetch_one(db)
    .await
}

/// Returns `false` when an identical meeting already exists.
pub async fn insert_meeting(db: &SqlitePool, meeting: &MeetingInsert<'_>) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO section_meetings
            (section_id, day_of_week, start_time, end_time, room, building)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (section_id, day_of_week, start_time, end_time) DO NOTHING
        "#,
    )
    .bind(meeting.section_id)
    .bind(meeting.day_of_week)
    .bind(meeting.start_time)
    .bind(meeting.end_time)
    .bind(meeting.room)
    .bind(meeting.building)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}
