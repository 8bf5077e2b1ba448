use async_trait::async_trait;
use scheduler::db::{self, repository};
use scheduler::db::repository::{CourseUpsert, MeetingInsert, ProfessorUpsert, SectionUpsert};
use scheduler::error::SeedError;
use scheduler::seed::SeedStore;
use scheduler::services::{SeedOutcome, SeedService, SeedSource};
use sqlx::SqlitePool;

const HEADER: &str = "Spring 2026,,,,,,,,,,,,,,\n\
Course schedule by term,,,,,,,,,,,,,,\n\
School,Level,Course Abbr,S/T,Course Title,Cr(US),Cr(ECTS),Start Date,End Date,Days,Time,Enr,Cap,Faculty,Room\n";

#[allow(clippy::too_many_arguments)]
fn row(
    code: &str,
    section: &str,
    credits: &str,
    days: &str,
    time: &str,
    cap: u32,
    faculty: &str,
    room: &str,
) -> String {
    format!(
        "SEDS,UG,{code},{section},\"Physics I\",0,{credits},13-JAN-26,24-APR-26,{days},{time},0,{cap},\"{faculty}\",\"{room}\"\n"
    )
}

fn sheet(rows: &[String]) -> String {
    let mut text = HEADER.to_string();
    for r in rows {
        text.push_str(r);
    }
    text
}

async fn setup() -> SqlitePool {
    db::connect_in_memory().await.expect("Failed to create test db")
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count failed")
}

fn service(pool: &SqlitePool) -> SeedService<SqlitePool> {
    SeedService::new(pool.clone(), SeedSource::Bundled, "nu.edu.kz")
}

#[tokio::test]
async fn test_lecture_credits_win() {
    let pool = setup().await;
    let text = sheet(&[
        row("PHYS 161", "1R", "3", "M", "09:00 AM-09:50 AM", 30, "Nurlan Zhakupov", ""),
        row("PHYS 161", "1L", "4", "W", "10:00 AM-10:50 AM", 150, "Nurlan Zhakupov", ""),
        row("PHYS 161", "2R", "5", "F", "09:00 AM-09:50 AM", 30, "Nurlan Zhakupov", ""),
    ]);

    service(&pool).seed_from_text(&text).await.expect("seed failed");

    let courses = repository::fetch_courses(&pool, None).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_code, "PHYS 161");
    assert_eq!(courses[0].credits, 4);
    assert_eq!(courses[0].semester, "Spring 2026");
}

#[tokio::test]
async fn test_sections_meetings_and_professors() {
    let pool = setup().await;
    let text = sheet(&[
        row("CSCI 151/CSCI 151A", "1L", "8", "MWF", "02:00 PM-03:15 PM", 70, "Aigerim Bekova, Timur Ospanov", "(C3) 1009 - cap:70"),
        row("CSCI 151", "1L", "8", "MWF", "02:00 PM-03:15 PM", 70, "Aigerim Bekova", "(C3) 1009 - cap:70"),
        row("CSCI 151", "1Lb", "0", "T", "09:00 AM-10:15 AM", 24, "Gulnara", "Green Hall - cap:231"),
        row("CSCI 151", "2S", "0", "Online/Distant", "Online/Distant", 25, "Online/Distant", "Online/Distant"),
    ]);

    let stats = service(&pool).seed_from_text(&text).await.expect("seed failed");
    assert_eq!(stats.courses_written, 1);
    assert_eq!(stats.sections_written, 3);
    assert_eq!(stats.professors_written, 1);
    assert_eq!(stats.meetings_added, 4);

    let course = repository::fetch_courses(&pool, None).await.unwrap().remove(0);
    let sections = repository::fetch_sections_for_course(&pool, course.id).await.unwrap();
    assert_eq!(sections.len(), 3);

    let lecture = sections
        .iter()
        .find(|s| s.section.section_number == "1L")
        .expect("lecture missing");
    assert_eq!(lecture.section.section_type, "Lecture");
    assert_eq!(lecture.section.total_seats, 70);
    let professor = lecture.professor.as_ref().expect("professor missing");
    assert_eq!(professor.email.as_deref(), Some("aigerim.bekova@nu.edu.kz"));
    let days: Vec<&str> = lecture.meetings.iter().map(|m| m.day_of_week.as_str()).collect();
    assert_eq!(days, vec!["Monday", "Wednesday", "Friday"]);
    assert_eq!(lecture.meetings[0].start_time, "14:00:00");
    assert_eq!(lecture.meetings[0].end_time, "15:15:00");
    assert_eq!(lecture.meetings[0].building.as_deref(), Some("C3"));
    assert_eq!(lecture.meetings[0].room.as_deref(), Some("1009"));

    let lab = sections
        .iter()
        .find(|s| s.section.section_number == "1Lb")
        .expect("lab missing");
    assert_eq!(lab.section.section_type, "Lab");
    assert!(lab.professor.is_none());
    assert_eq!(lab.meetings[0].building.as_deref(), Some("Green Hall"));
    assert_eq!(lab.meetings[0].room, None);

    let seminar = sections
        .iter()
        .find(|s| s.section.section_number == "2S")
        .expect("seminar missing");
    assert!(seminar.meetings.is_empty());
}

#[tokio::test]
async fn test_seed_if_empty_is_idempotent() {
    let pool = setup().await;
    let seeder = service(&pool);

    let first = seeder.seed_if_empty().await.expect("seed failed");
    assert!(matches!(first, SeedOutcome::Seeded(_)));

    let courses = count(&pool, "courses").await;
    let sections = count(&pool, "sections").await;
    let meetings = count(&pool, "section_meetings").await;
    assert!(courses > 0);

    let second = seeder.seed_if_empty().await.expect("seed failed");
    assert_eq!(second, SeedOutcome::Skipped { existing_courses: courses });
    assert_eq!(count(&pool, "courses").await, courses);
    assert_eq!(count(&pool, "sections").await, sections);
    assert_eq!(count(&pool, "section_meetings").await, meetings);
}

#[tokio::test]
async fn test_reseed_never_duplicates_meetings() {
    let pool = setup().await;
    let text = sheet(&[
        row("MATH 161", "1L", "8", "MW", "02:00 PM-03:15 PM", 231, "Yerlan Amanbek", "Green Hall - cap:231"),
        row("MATH 161", "1R", "0", "T", "09:00 AM-09:50 AM", 40, "Yerlan Amanbek", "(7E) 221 - cap:40"),
        row("MATH 161", "1R", "0", "T", "09:00 AM-09:50 AM", 40, "Yerlan Amanbek", "(7E) 221 - cap:40"),
    ]);
    let seeder = service(&pool);

    seeder.seed_from_text(&text).await.expect("seed failed");
    assert_eq!(count(&pool, "section_meetings").await, 3);

    let again = seeder.seed_from_text(&text).await.expect("seed failed");
    assert_eq!(again.meetings_added, 0);
    assert_eq!(again.courses_written, 1);
    assert_eq!(again.sections_written, 2);
    assert_eq!(count(&pool, "section_meetings").await, 3);
    assert_eq!(count(&pool, "sections").await, 2);
    assert_eq!(count(&pool, "professors").await, 1);
}

#[tokio::test]
async fn test_reseed_overwrites_seats_but_keeps_credits() {
    let pool = setup().await;
    let seeder = service(&pool);

    seeder
        .seed_from_text(&sheet(&[row("MATH 161", "1L", "8", "M", "09:00 AM-09:50 AM", 200, "", "")]))
        .await
        .expect("seed failed");
    seeder
        .seed_from_text(&sheet(&[row("MATH 161", "1L", "6", "M", "09:00 AM-09:50 AM", 231, "", "")]))
        .await
        .expect("seed failed");

    let course = repository::fetch_courses(&pool, None).await.unwrap().remove(0);
    assert_eq!(course.credits, 8);
    let sections = repository::fetch_sections_for_course(&pool, course.id).await.unwrap();
    assert_eq!(sections[0].section.total_seats, 231);
}

#[tokio::test]
async fn test_section_professor_comes_from_first_row() {
    let pool = setup().await;
    let text = sheet(&[
        row("CSCI 151", "1L", "8", "M", "02:00 PM-03:15 PM", 70, "Aigerim Bekova", ""),
        row("CSCI 151", "1L", "8", "W", "02:00 PM-03:15 PM", 70, "Timur Ospanov", ""),
    ]);

    let stats = service(&pool).seed_from_text(&text).await.expect("seed failed");
    assert_eq!(stats.professors_written, 1);
    assert_eq!(count(&pool, "professors").await, 1);

    let course = repository::fetch_courses(&pool, None).await.unwrap().remove(0);
    let sections = repository::fetch_sections_for_course(&pool, course.id).await.unwrap();
    let professor = sections[0].professor.as_ref().expect("professor missing");
    assert_eq!(professor.last_name, "Bekova");
    assert_eq!(sections[0].meetings.len(), 2);
}

#[tokio::test]
async fn test_last_row_sets_section_seats() {
    let pool = setup().await;
    let text = sheet(&[
        row("MATH 161", "1L", "8", "M", "02:00 PM-03:15 PM", 70, "Yerlan Amanbek", ""),
        row("MATH 161", "1L", "8", "W", "02:00 PM-03:15 PM", 40, "Yerlan Amanbek", ""),
    ]);

    service(&pool).seed_from_text(&text).await.expect("seed failed");

    let course = repository::fetch_courses(&pool, None).await.unwrap().remove(0);
    let sections = repository::fetch_sections_for_course(&pool, course.id).await.unwrap();
    assert_eq!(sections[0].section.total_seats, 40);
    assert_eq!(sections[0].section.available_seats, 40);
}

#[tokio::test]
async fn test_short_input_is_fatal() {
    let pool = setup().await;
    let result = service(&pool).seed_from_text(HEADER).await;
    assert!(matches!(result, Err(SeedError::TooShort(3))));
    assert_eq!(count(&pool, "courses").await, 0);
}

/// Rejects one course code and otherwise behaves like the real database.
struct FlakyStore {
    pool: SqlitePool,
    broken_course: &'static str,
}

#[async_trait]
impl SeedStore for FlakyStore {
    async fn count_courses(&self) -> Result<i64, sqlx::Error> {
        self.pool.count_courses().await
    }

    async fn upsert_professor(&self, professor: &ProfessorUpsert<'_>) -> Result<i64, sqlx::Error> {
        self.pool.upsert_professor(professor).await
    }

    async fn upsert_course(&self, course: &CourseUpsert<'_>) -> Result<i64, sqlx::Error> {
        if course.course_code == self.broken_course {
            return Err(sqlx::Error::Protocol("constraint failed".to_string()));
        }
        self.pool.upsert_course(course).await
    }

    async fn upsert_section(&self, section: &SectionUpsert<'_>) -> Result<i64, sqlx::Error> {
        self.pool.upsert_section(section).await
    }

    async fn insert_meeting(&self, meeting: &MeetingInsert<'_>) -> Result<bool, sqlx::Error> {
        self.pool.insert_meeting(meeting).await
    }
}

#[tokio::test]
async fn test_failed_course_does_not_abort_run() {
    let pool = setup().await;
    let store = FlakyStore {
        pool: pool.clone(),
        broken_course: "HST 100",
    };
    let text = sheet(&[
        row("HST 100", "1S", "6", "TR", "12:00 PM-01:15 PM", 25, "Marat Kenzhebayev", ""),
        row("HST 100", "2S", "6", "TR", "03:00 PM-04:15 PM", 25, "Marat Kenzhebayev", ""),
        row("CSCI 235", "1L", "6", "TR", "10:30 AM-11:45 AM", 70, "Timur Ospanov", ""),
    ]);

    let seeder = SeedService::new(store, SeedSource::Bundled, "nu.edu.kz");
    let stats = seeder.seed_from_text(&text).await.expect("seed failed");

    assert_eq!(stats.courses_written, 1);
    assert_eq!(stats.sections_written, 1);
    // the course itself plus its two sections
    assert_eq!(stats.write_failures, 3);

    let courses = repository::fetch_courses(&pool, None).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_code, "CSCI 235");
    assert_eq!(count(&pool, "section_meetings").await, 2);
}
