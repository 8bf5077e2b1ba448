use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveTime;
use tracing::{debug, warn};

use crate::db::repository::ProfessorUpsert;
use crate::models::{DayOfWeek, SectionType};
use crate::seed::parser::{FacultyName, Location, RowRecord};
use crate::seed::store::SeedStore;

/// Where a course's chosen credit value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditSource {
    Unset,
    Other,
    Lecture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseInfo {
    pub title: String,
    pub credits: f64,
    pub source: CreditSource,
}

impl CourseInfo {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            credits: 0.0,
            source: CreditSource::Unset,
        }
    }

    /// A positive Lecture value wins and is never replaced. Until one shows
    /// up, the first non-zero value from any row holds.
    pub fn offer_credits(&mut self, section_type: SectionType, credits: f64) {
        match self.source {
            CreditSource::Lecture => {}
            _ if section_type == SectionType::Lecture && credits > 0.0 => {
                self.credits = credits;
                self.source = CreditSource::Lecture;
            }
            CreditSource::Unset if credits != 0.0 => {
                self.credits = credits;
                self.source = CreditSource::Other;
            }
            _ => {}
        }
    }

    pub fn stored_credits(&self) -> i64 {
        self.credits as i64
    }

    pub fn is_internship(&self) -> bool {
        self.title.to_lowercase().contains("internship")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub course_code: String,
    pub section_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeetingKey {
    pub day: DayOfWeek,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl MeetingKey {
    pub fn start_str(&self) -> String {
        self.start.format("%H:%M:%S").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionInfo {
    pub section_type: SectionType,
    pub title: String,
    pub capacity: i64,
    pub professor_id: Option<i64>,
    pub meetings: BTreeMap<MeetingKey, Location>,
}

impl SectionInfo {
    fn new(section_type: SectionType, title: &str) -> Self {
        Self {
            section_type,
            title: title.to_string(),
            capacity: 0,
            professor_id: None,
            meetings: BTreeMap::new(),
        }
    }
}

/// Result of folding every row of one run.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub courses: HashMap<String, CourseInfo>,
    pub sections: HashMap<SectionKey, SectionInfo>,
    pub professors: usize,
}

pub struct Aggregator {
    email_domain: String,
    courses: HashMap<String, CourseInfo>,
    sections: HashMap<SectionKey, SectionInfo>,
    professors: HashMap<String, i64>,
}

impl Aggregator {
    pub fn new(email_domain: &str) -> Self {
        Self {
            email_domain: email_domain.to_string(),
            courses: HashMap::new(),
            sections: HashMap::new(),
            professors: HashMap::new(),
        }
    }

    /// Folds one row in. Rows must arrive in source order because the
    /// credit choice depends on it. The professor of a section is taken from
    /// the row that introduces the section and written to `store` right away
    /// so the section can reference it later.
    pub async fn absorb<S: SeedStore + ?Sized>(&mut self, row: RowRecord, store: &S) {
        self.courses
            .entry(row.course_code.clone())
            .or_insert_with(|| CourseInfo::new(&row.title))
            .offer_credits(row.section_type, row.credits);

        let key = SectionKey {
            course_code: row.course_code,
            section_number: row.section_number,
        };

        if !self.sections.contains_key(&key) {
            debug!("new section {} {}", key.course_code, key.section_number);
            let mut info = SectionInfo::new(row.section_type, &row.title);
            if let Some(faculty) = &row.faculty {
                info.professor_id = self.resolve_professor(faculty, store).await;
            }
            self.sections.insert(key.clone(), info);
        }
        let Some(section) = self.sections.get_mut(&key) else {
            return;
        };

        // Last row wins, matching the seat refresh a reseed performs.
        section.capacity = row.capacity;

        if let Some(window) = row.window {
            for day in row.days {
                let key = MeetingKey {
                    day,
                    start: window.start,
                    end: window.end,
                };
                section
                    .meetings
                    .entry(key)
                    .or_insert_with(|| row.location.clone());
            }
        }
    }

    /// Same raw name, same professor. Different spellings of one person stay
    /// separate records.
    async fn resolve_professor<S: SeedStore + ?Sized>(
        &mut self,
        faculty: &FacultyName,
        store: &S,
    ) -> Option<i64> {
        if let Some(id) = self.professors.get(&faculty.raw) {
            return Some(*id);
        }

        let email = faculty.email(&self.email_domain);
        let upsert = ProfessorUpsert {
            first_name: &faculty.first_name,
            last_name: &faculty.last_name,
            email: &email,
        };

        match store.upsert_professor(&upsert).await {
            Ok(id) => {
                self.professors.insert(faculty.raw.clone(), id);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to insert professor {}: {}", faculty.raw, e);
                None
            }
        }
    }

    pub fn finish(self) -> Aggregate {
        let professors = self.professors.values().collect::<HashSet<_>>().len();
        Aggregate {
            courses: self.courses,
            sections: self.sections,
            professors,
        }
    }
}
