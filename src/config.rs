// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Score ratio (0.0 - 1.0) required for a lecture quiz to count as passed.
pub const QUIZ_PASS_RATIO: f64 = 0.7;

/// Video watch percentage at which a lecture counts as completed.
pub const VIDEO_COMPLETE_PERCENT: u32 = 90;

/// Completion percentage required to claim a course certificate.
pub const CERTIFICATE_THRESHOLD: u32 = 90;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Self {
            data_dir,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            admin_name: env::var("ADMIN_NAME").ok(),
        }
    }
}
