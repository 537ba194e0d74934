// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Maximum number of historical results returned by the history endpoints.
pub const RESULT_HISTORY_LIMIT: i64 = 10;

/// Number of questions in a real-test paper.
pub const REAL_TEST_QUESTION_COUNT: usize = 50;

/// Marks awarded per correct answer in a real test.
pub const MARKS_PER_QUESTION: u32 = 2;

/// Real tests are cut off after one hour.
pub const REAL_TEST_DURATION_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub question_bank_dir: String,
    pub results_page_path: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 60 * 24);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let question_bank_dir = env::var("QUESTION_BANK_DIR")
            .unwrap_or_else(|_| "data/questions".to_string());

        let results_page_path = env::var("RESULTS_PAGE_PATH")
            .unwrap_or_else(|_| "/results".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            question_bank_dir,
            results_page_path,
            bind_addr,
        }
    }
}
