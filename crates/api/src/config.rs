use std::path::PathBuf;

use prisma_core::validation::DEFAULT_MAX_UPLOAD_BYTES;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// SQLite connection string.
    pub database_url: String,
    /// Directory where evidence uploads are written and served from.
    pub upload_dir: PathBuf,
    /// Largest accepted upload body, in bytes.
    pub max_upload_bytes: usize,
    /// Explicit activity catalog file, tried before the default locations.
    pub catalog_path: Option<PathBuf>,
    /// Password given to seeded accounts that have none yet.
    pub admin_initial_password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                      |
    /// |--------------------------|------------------------------|
    /// | `HOST`                   | `0.0.0.0`                    |
    /// | `PORT`                   | `5000`                       |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`      |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                         |
    /// | `DATABASE_URL`           | `sqlite://prisma.db?mode=rwc`|
    /// | `UPLOAD_DIR`             | `uploads`                    |
    /// | `MAX_UPLOAD_BYTES`       | `16777216` (16 MiB)          |
    /// | `CATALOG_PATH`           | unset                        |
    /// | `ADMIN_INITIAL_PASSWORD` | `admin123`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://prisma.db?mode=rwc".into());

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .map(|v| v.parse().expect("MAX_UPLOAD_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let catalog_path = std::env::var("CATALOG_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let admin_initial_password =
            std::env::var("ADMIN_INITIAL_PASSWORD").unwrap_or_else(|_| "admin123".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            upload_dir,
            max_upload_bytes,
            catalog_path,
            admin_initial_password,
        }
    }
}
