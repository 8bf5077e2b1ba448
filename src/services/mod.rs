pub mod seed_service;

pub use seed_service::{SeedOutcome, SeedService, SeedSource, SeedStats};
