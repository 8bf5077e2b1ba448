use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Professor;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credits: i64,
    pub is_internship: bool,
    pub description: Option<String>,
    pub semester: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub id: i64,
    pub course_id: i64,
    pub section_number: String,
    pub section_type: String,
    pub professor_id: Option<i64>,
    pub total_seats: i64,
    pub available_seats: i64,
    pub parent_section_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionMeeting {
    pub id: i64,
    pub section_id: i64,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub building: Option<String>,
}

/// A section together with everything a client needs to render it.
#[derive(Debug, Clone, Serialize)]
pub struct SectionWithDetails {
    #[serde(flatten)]
    pub section: Section,
    pub course: CourseSummary,
    pub professor: Option<Professor>,
    pub meetings: Vec<SectionMeeting>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    pub id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credits: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseQueryParams {
    pub semester: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Lecture,
    Seminar,
    Lab,
    Recitation,
}

impl SectionType {
    /// Classifies a section code such as `1L` or `2Lb` by its last character.
    pub fn classify(code: &str) -> Self {
        match code.chars().last().map(|c| c.to_ascii_uppercase()) {
            Some('S') => SectionType::Seminar,
            Some('B') => SectionType::Lab,
            Some('R') => SectionType::Recitation,
            _ => SectionType::Lecture,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Lecture => "Lecture",
            SectionType::Seminar => "Seminar",
            SectionType::Lab => "Lab",
            SectionType::Recitation => "Recitation",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Single-letter codes used by the registrar export. Sunday has none.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(DayOfWeek::Monday),
            'T' => Some(DayOfWeek::Tuesday),
            'W' => Some(DayOfWeek::Wednesday),
            'R' => Some(DayOfWeek::Thursday),
            'F' => Some(DayOfWeek::Friday),
            'S' => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
