// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Secret used to sign session tokens.
    pub session_secret: String,
    /// Session lifetime in seconds.
    pub session_ttl_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let session_secret = env::var("SESSION_SECRET").expect("SESSION_SECRET must be set");

        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 60 * 24);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            session_secret,
            session_ttl_secs,
            rust_log,
        }
    }
}
