use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository::{self, CourseUpsert, MeetingInsert, ProfessorUpsert, SectionUpsert};

/// Storage operations the importer needs. Every write is an upsert keyed on
/// a natural key, so replaying a run never duplicates rows.
#[async_trait]
pub trait SeedStore: Send + Sync {
    async fn count_courses(&self) -> Result<i64, sqlx::Error>;
    async fn upsert_professor(&self, professor: &ProfessorUpsert<'_>) -> Result<i64, sqlx::Error>;
    async fn upsert_course(&self, course: &CourseUpsert<'_>) -> Result<i64, sqlx::Error>;
    async fn upsert_section(&self, section: &SectionUpsert<'_>) -> Result<i64, sqlx::Error>;
    /// `Ok(false)` when the identical meeting was already there.
    async fn insert_meeting(&self, meeting: &MeetingInsert<'_>) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl SeedStore for SqlitePool {
    async fn count_courses(&self) -> Result<i64, sqlx::Error> {
        repository::count_courses(self).await
    }

    async fn upsert_professor(&self, professor: &ProfessorUpsert<'_>) -> Result<i64, sqlx::Error> {
        repository::upsert_professor(self, professor).await
    }

    async fn upsert_course(&self, course: &CourseUpsert<'_>) -> Result<i64, sqlx::Error> {
        repository::upsert_course(self, course).await
    }

    async fn upsert_section(&self, section: &SectionUpsert<'_>) -> Result<i64, sqlx::Error> {
        repository::upsert_section(self, section).await
    }

    async fn insert_meeting(&self, meeting: &MeetingInsert<'_>) -> Result<bool, sqlx::Error> {
        repository::insert_meeting(self, meeting).await
    }
}
