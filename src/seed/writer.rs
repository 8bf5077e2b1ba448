use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::db::repository::{CourseUpsert, MeetingInsert, SectionUpsert};
use crate::seed::aggregate::{Aggregate, CourseInfo, SectionInfo, SectionKey};
use crate::seed::store::SeedStore;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    pub courses: usize,
    pub sections: usize,
    pub meetings: usize,
    pub failures: usize,
}

/// Writes every aggregated section with its course and meetings. A failed
/// write is logged and skipped together with whatever depends on it, and
/// each skipped section counts as a failure. `courses` and `sections` count
/// successful upserts; `meetings` counts only newly inserted rows.
pub async fn write_all<S: SeedStore + ?Sized>(
    aggregate: &Aggregate,
    semester: &str,
    store: &S,
) -> WriteStats {
    let mut stats = WriteStats::default();
    let mut course_ids: HashMap<&str, Option<i64>> = HashMap::new();

    for (key, section) in &aggregate.sections {
        let Some(course) = aggregate.courses.get(&key.course_code) else {
            warn!("No course info for section {} {}", key.course_code, key.section_number);
            stats.failures += 1;
            continue;
        };

        let course_id = match course_ids.get(key.course_code.as_str()) {
            Some(id) => *id,
            None => {
                let id = write_course(&key.course_code, course, semester, store).await;
                match id {
                    Some(_) => stats.courses += 1,
                    None => stats.failures += 1,
                }
                course_ids.insert(&key.course_code, id);
                id
            }
        };
        let Some(course_id) = course_id else {
            debug!("skipping section {} {} without course", key.course_code, key.section_number);
            stats.failures += 1;
            continue;
        };

        let Some(section_id) = write_section(course_id, key, section, store).await else {
            stats.failures += 1;
            continue;
        };
        stats.sections += 1;

        for (meeting, location) in &section.meetings {
            let start_time = meeting.start_str();
            let end_time = meeting.end_str();
            let insert = MeetingInsert {
                section_id,
                day_of_week: meeting.day.as_str(),
                start_time: &start_time,
                end_time: &end_time,
                room: location.room.as_deref(),
                building: location.building.as_deref(),
            };

            match store.insert_meeting(&insert).await {
                Ok(true) => stats.meetings += 1,
                Ok(false) => debug!("meeting already present for section {}", section_id),
                Err(e) => {
                    warn!("Failed to insert meeting for section {}: {}", section_id, e);
                    stats.failures += 1;
                }
            }
        }
    }

    stats
}

async fn write_course<S: SeedStore + ?Sized>(
    code: &str,
    course: &CourseInfo,
    semester: &str,
    store: &S,
) -> Option<i64> {
    let upsert = CourseUpsert {
        course_code: code,
        course_name: &course.title,
        credits: course.stored_credits(),
        semester,
        is_internship: course.is_internship(),
    };

    match store.upsert_course(&upsert).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Failed to insert course {}: {}", code, e);
            None
        }
    }
}

async fn write_section<S: SeedStore + ?Sized>(
    course_id: i64,
    key: &SectionKey,
    section: &SectionInfo,
    store: &S,
) -> Option<i64> {
    let upsert = SectionUpsert {
        course_id,
        section_number: &key.section_number,
        section_type: section.section_type.as_str(),
        professor_id: section.professor_id,
        total_seats: section.capacity,
    };

    match store.upsert_section(&upsert).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(
                "Failed to insert section {}-{}: {}",
                key.course_code, key.section_number, e
            );
            None
        }
    }
}
