use std::env;

use anyhow::{Context, Result};

use crate::db::DEFAULT_MAX_POOL_SIZE;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: i64,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub cors_allowed_origin: Option<String>,
    pub standard_bed_price: f64,
    pub standard_deposit: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_pool_size = env::var("DATABASE_MAX_POOL_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_POOL_SIZE);
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "dormbook".to_string());
        let jwt_audience =
            env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dormbook-admin".to_string());
        let jwt_expiry_minutes = env::var("JWT_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("JWT_EXPIRY_MINUTES must be an integer")?;
        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password_hash =
            env::var("ADMIN_PASSWORD_HASH").context("ADMIN_PASSWORD_HASH must be set")?;
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok();
        let standard_bed_price = env::var("STANDARD_BED_PRICE")
            .unwrap_or_else(|_| "55.0".to_string())
            .parse()
            .context("STANDARD_BED_PRICE must be a number")?;
        let standard_deposit = env::var("STANDARD_DEPOSIT")
            .unwrap_or_else(|_| "100.0".to_string())
            .parse()
            .context("STANDARD_DEPOSIT must be a number")?;

        Ok(Self {
            database_url,
            database_max_pool_size,
            server_host,
            server_port,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            jwt_expiry_minutes,
            admin_username,
            admin_password_hash,
            cors_allowed_origin,
            standard_bed_price,
            standard_deposit,
        })
    }
}
