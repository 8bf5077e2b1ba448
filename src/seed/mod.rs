//! Registrar CSV import: load rows, parse each into a typed record, fold the
//! records into per-course and per-section aggregates, then upsert them.

pub mod aggregate;
pub mod loader;
pub mod parser;
pub mod store;
pub mod writer;

pub use aggregate::{Aggregate, Aggregator, CourseInfo, CreditSource, MeetingKey, SectionInfo, SectionKey};
pub use loader::{Sheet, load};
pub use parser::{FacultyName, Location, RowRecord, TimeWindow, parse_row};
pub use store::SeedStore;
pub use writer::{WriteStats, write_all};
