use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: Option<String>,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
    /// Institutional domain, without the `@`. Students must register with it
    /// and synthesized professor emails use it.
    pub email_domain: String,
    pub seed_csv_path: Option<PathBuf>,
    pub reset_db_on_start: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://scheduler.db?mode=rwc".to_string(),
            max_connections: 5,
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: None,
            jwt_expiry_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            email_domain: "nu.edu.kz".to_string(),
            seed_csv_path: None,
            reset_db_on_start: false,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            jwt_expiry_hours: parse_var("JWT_EXPIRY_HOURS", defaults.jwt_expiry_hours)?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            email_domain: env::var("STUDENT_EMAIL_DOMAIN")
                .map(|d| d.trim_start_matches('@').to_string())
                .unwrap_or(defaults.email_domain),
            seed_csv_path: env::var("SEED_CSV_PATH").ok().map(PathBuf::from),
            reset_db_on_start: env::var("RESET_DB_ON_START")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_allowed_origins),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "yes")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
