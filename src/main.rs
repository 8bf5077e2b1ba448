use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheduler::api::router;
use scheduler::config::AppConfig;
use scheduler::db;
use scheduler::services::{SeedOutcome, SeedService, SeedSource};
use scheduler::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "scheduler=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    if config.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; login and registration will fail");
    }

    let pool = db::connect(&config.database_url, config.max_connections).await?;

    if config.reset_db_on_start {
        db::reset_course_data(&pool).await?;
    }

    let seeder = SeedService::new(
        pool.clone(),
        SeedSource::from_path(config.seed_csv_path.clone()),
        config.email_domain.clone(),
    );
    match seeder.seed_if_empty().await {
        Ok(SeedOutcome::Seeded(stats)) => info!("seeded {:?}", stats),
        Ok(SeedOutcome::Skipped { existing_courses }) => {
            info!("seed skipped, {} courses present", existing_courses)
        }
        Err(e) => warn!("Failed to seed database: {}", e),
    }

    let addr = config.bind_addr();
    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };
    let app = router(state);

    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
