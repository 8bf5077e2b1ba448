use chrono::NaiveTime;
use csv::StringRecord;

use crate::models::{DayOfWeek, SectionType};

/// Rows shorter than this are not data rows.
pub const MIN_FIELDS: usize = 15;

/// Placeholder the registrar puts in the time and faculty columns of remote
/// sections.
pub const REMOTE_SENTINEL: &str = "Online/Distant";

const COURSE_ABBR: usize = 2;
const SECTION: usize = 3;
const TITLE: usize = 4;
const CREDITS_ECTS: usize = 6;
const DAYS: usize = 9;
const TIME: usize = 10;
const CAPACITY: usize = 12;
const FACULTY: usize = 13;
const ROOM: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub course_code: String,
    pub section_number: String,
    pub section_type: SectionType,
    pub title: String,
    pub credits: f64,
    pub days: Vec<DayOfWeek>,
    pub window: Option<TimeWindow>,
    pub location: Location,
    pub capacity: i64,
    pub faculty: Option<FacultyName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub building: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyName {
    /// First listed name exactly as written; the professor cache key.
    pub raw: String,
    pub first_name: String,
    pub last_name: String,
}

impl FacultyName {
    pub fn email(&self, domain: &str) -> String {
        format!(
            "{}.{}@{}",
            strip_spaces(&self.first_name.to_lowercase()),
            strip_spaces(&self.last_name.to_lowercase()),
            domain
        )
    }
}

/// Parses one data row. `None` means the row is not a course row at all.
pub fn parse_row(row: &StringRecord) -> Option<RowRecord> {
    if row.len() < MIN_FIELDS {
        return None;
    }

    let field = move |idx: usize| row.get(idx).unwrap_or_default().trim();

    let course_code = parse_course_code(field(COURSE_ABBR))?;
    let section_number = field(SECTION).to_string();

    Some(RowRecord {
        course_code,
        section_type: SectionType::classify(&section_number),
        section_number,
        title: field(TITLE).to_string(),
        credits: parse_credits(field(CREDITS_ECTS)),
        days: parse_days(field(DAYS)),
        window: parse_time_window(field(TIME)),
        location: parse_location(field(ROOM)),
        capacity: field(CAPACITY).parse().unwrap_or(0),
        faculty: parse_faculty(field(FACULTY)),
    })
}

/// Cross-listed abbreviations such as `MATH 161/MATH 161A` keep only the
/// first listing.
pub fn parse_course_code(abbr: &str) -> Option<String> {
    let code = abbr.split('/').next().unwrap_or_default().trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

pub fn parse_credits(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

pub fn parse_days(value: &str) -> Vec<DayOfWeek> {
    value.chars().filter_map(DayOfWeek::from_code).collect()
}

/// `02:00 PM-03:15 PM` style ranges. Anything else yields no window.
pub fn parse_time_window(value: &str) -> Option<TimeWindow> {
    let value = value.trim();
    if value.is_empty() || value == REMOTE_SENTINEL {
        return None;
    }

    let (start, end) = value.split_once('-')?;
    if end.contains('-') {
        return None;
    }

    Some(TimeWindow {
        start: parse_clock(start)?,
        end: parse_clock(end)?,
    })
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%I:%M %p").ok()
}

impl TimeWindow {
    pub fn start_str(&self) -> String {
        self.start.format("%H:%M:%S").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%H:%M:%S").to_string()
    }
}

/// Rooms look like `(C3) 1009 - cap:70` or `Green Hall - cap:231`.
pub fn parse_location(value: &str) -> Location {
    let leading = value.split('-').next().unwrap_or_default().trim();
    if leading.is_empty() {
        return Location::default();
    }

    if let (Some(open), Some(close)) = (leading.find('('), leading.find(')')) {
        if open < close {
            return Location {
                building: non_empty(&leading[open + 1..close]),
                room: non_empty(&leading[close + 1..]),
            };
        }
    }

    Location {
        building: non_empty(leading),
        room: None,
    }
}

/// Only the first of several comma separated instructors is kept, and a
/// single-word name cannot be split into first and last name.
pub fn parse_faculty(value: &str) -> Option<FacultyName> {
    let value = value.trim();
    if value.is_empty() || value == REMOTE_SENTINEL {
        return None;
    }

    let name = value.split(',').next().unwrap_or_default().trim();
    let mut tokens = name.split_whitespace();
    let first_name = tokens.next()?;
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() {
        return None;
    }

    Some(FacultyName {
        raw: name.to_string(),
        first_name: first_name.to_string(),
        last_name: rest.join(" "),
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
