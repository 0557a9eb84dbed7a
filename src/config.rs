use dotenvy;

use crate::middleware::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_namespace: String,
    pub db_database: String,
    pub db_password: Option<String>,
    pub db_username: Option<String>,
    pub db_url: String,
    pub jwt_secret: String,
    pub jwt_duration_days: i64,
    pub uploads_dir: String,
    pub upload_file_size_max_mb: u64,
    pub is_development: bool,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let db_namespace = std::env::var("DB_NAMESPACE").unwrap_or("namespace".to_string());
        let db_database = std::env::var("DB_DATABASE").unwrap_or("database".to_string());
        let db_password = std::env::var("DB_PASSWORD").ok();
        let db_username = std::env::var("DB_USERNAME").ok();
        let db_url = std::env::var("DB_URL").unwrap_or("mem://".to_string());

        let jwt_secret = required_var("JWT_SECRET")?;
        let jwt_duration_days = parse_var("JWT_DURATION_DAYS", 7)?;

        let uploads_dir = std::env::var("UPLOADS_DIRECTORY").unwrap_or("uploads".to_string());
        let upload_file_size_max_mb = parse_var("UPLOAD_MAX_SIZE_MB", 10)?;

        let is_development = std::env::var("DEVELOPMENT")
            .map(|v| v.eq("true"))
            .unwrap_or(false);
        let server_port = parse_var("SERVER_PORT", 8080)?;

        Ok(Self {
            db_namespace,
            db_database,
            db_password,
            db_username,
            db_url,
            jwt_secret,
            jwt_duration_days,
            uploads_dir,
            upload_file_size_max_mb,
            is_development,
            server_port,
        })
    }
}

fn required_var(name: &str) -> AppResult<String> {
    std::env::var(name).map_err(|_| AppError::Generic {
        description: format!("Missing {name} in env"),
    })
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match std::env::var(name) {
        Ok(value) => value.parse::<T>().map_err(|_| AppError::Generic {
            description: format!("{name} must be a number"),
        }),
        Err(_) => Ok(default),
    }
}
