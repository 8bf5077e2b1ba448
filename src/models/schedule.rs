use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::SectionWithDetails;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub student_id: i64,
    pub schedule_name: String,
    pub description: Option<String>,
    pub is_submitted: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleWithSections {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub sections: Vec<SectionWithDetails>,
    pub total_credits: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub schedule_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSectionRequest {
    pub section_id: i64,
    pub meeting_id: Option<i64>,
}
