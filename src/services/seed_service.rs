use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::error::SeedError;
use crate::seed::{self, Aggregator, SeedStore};

const BUNDLED_CSV: &str = include_str!("../../data/school_schedule_by_term.csv");

#[derive(Debug, Clone)]
pub enum SeedSource {
    Bundled,
    File(PathBuf),
}

impl SeedSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(SeedSource::File).unwrap_or(SeedSource::Bundled)
    }

    async fn read(&self) -> Result<String, SeedError> {
        match self {
            SeedSource::Bundled => Ok(BUNDLED_CSV.to_string()),
            SeedSource::File(path) => {
                info!("Reading seed data from {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
        }
    }
}

/// Report of one import. The `*_written` counts include rows that already
/// existed and were refreshed; `meetings_added` counts new meetings only.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SeedStats {
    pub semester: String,
    pub rows_skipped: usize,
    pub courses_written: usize,
    pub sections_written: usize,
    pub professors_written: usize,
    pub meetings_added: usize,
    pub write_failures: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Skipped { existing_courses: i64 },
    Seeded(SeedStats),
}

pub struct SeedService<S> {
    store: S,
    source: SeedSource,
    email_domain: String,
}

impl<S: SeedStore> SeedService<S> {
    pub fn new(store: S, source: SeedSource, email_domain: impl Into<String>) -> Self {
        Self {
            store,
            source,
            email_domain: email_domain.into(),
        }
    }

    /// Imports the course catalogue unless the courses table already holds
    /// data.
    pub async fn seed_if_empty(&self) -> Result<SeedOutcome, SeedError> {
        let existing_courses = self.store.count_courses().await?;
        if existing_courses > 0 {
            info!("Database already has {} courses, skipping seed", existing_courses);
            return Ok(SeedOutcome::Skipped { existing_courses });
        }

        let text = self.source.read().await?;
        self.seed_from_text(&text).await.map(SeedOutcome::Seeded)
    }

    /// Runs the import unconditionally. Safe to repeat: every write is an
    /// upsert.
    pub async fn seed_from_text(&self, text: &str) -> Result<SeedStats, SeedError> {
        info!("Starting database seeding...");

        info!("Step 1: Loading rows");
        let sheet = seed::load(text)?;
        info!("Loaded {} data rows for {}", sheet.rows.len(), sheet.semester);

        info!("Step 2: Parsing and aggregating rows");
        let mut aggregator = Aggregator::new(&self.email_domain);
        let mut rows_skipped = 0;
        for row in &sheet.rows {
            match seed::parse_row(row) {
                Some(record) => aggregator.absorb(record, &self.store).await,
                None => rows_skipped += 1,
            }
        }
        let aggregate = aggregator.finish();
        info!(
            "Aggregated {} courses, {} sections, skipped {} rows",
            aggregate.courses.len(),
            aggregate.sections.len(),
            rows_skipped
        );

        info!("Step 3: Writing courses, sections and meetings");
        let written = seed::write_all(&aggregate, &sheet.semester, &self.store).await;

        let stats = SeedStats {
            semester: sheet.semester,
            rows_skipped,
            courses_written: written.courses,
            sections_written: written.sections,
            professors_written: aggregate.professors,
            meetings_added: written.meetings,
            write_failures: written.failures,
        };
        info!(
            "Seeding complete: wrote {} courses, {} sections, {} professors; added {} meetings ({} failures)",
            stats.courses_written,
            stats.sections_written,
            stats.professors_written,
            stats.meetings_added,
            stats.write_failures
        );

        Ok(stats)
    }
}
