pub mod repository;
pub mod schedules;
pub mod students;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied. Every
/// connection to `sqlite::memory:` is its own database, so the pool must
/// never open a second one or recycle the first.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Wipes everything the seeder owns so the next start reseeds from scratch.
/// Students and their (now empty) schedules are kept.
pub async fn reset_course_data(db: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;

    for table in [
        "schedule_sections",
        "section_meetings",
        "sections",
        "courses",
        "professors",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        "DELETE FROM sqlite_sequence WHERE name IN \
         ('schedule_sections', 'section_meetings', 'sections', 'courses', 'professors')",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("course data reset");
    Ok(())
}
