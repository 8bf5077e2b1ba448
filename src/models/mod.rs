pub mod course;
pub mod professor;
pub mod schedule;
pub mod student;

pub use course::{
    Course, CourseQueryParams, CourseSummary, DayOfWeek, Section, SectionMeeting, SectionType,
    SectionWithDetails,
};
pub use professor::Professor;
pub use schedule::{AddSectionRequest, CreateScheduleRequest, Schedule, ScheduleWithSections};
pub use student::{AuthResponse, LoginRequest, RegisterRequest, Student};
