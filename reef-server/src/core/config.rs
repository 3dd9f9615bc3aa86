use crate::auth::{AuthGateConfig, JwtConfig};

/// Server configuration
///
/// # Environment variables
///
/// Every item can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/reef | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP service port |
/// | API_BASE | /api/v1 | Base path the API is mounted under |
/// | ENVIRONMENT | development | Runtime environment |
/// | JWT_SECRET | (dev fallback) | Token signing secret |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/reef HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database files and logs
    pub work_dir: String,
    /// HTTP API service port
    pub http_port: u16,
    /// Base path the API is mounted under
    pub api_base: String,
    /// JWT authentication configuration
    pub jwt: JwtConfig,
    /// Paths exempted from the authentication gate
    pub auth_gate: AuthGateConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        let api_base = std::env::var("API_BASE").unwrap_or_else(|_| "/api/v1".into());
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/reef".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(),
            auth_gate: AuthGateConfig::for_api_base(&api_base),
            api_base,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Whether this is the production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is the development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Path of the embedded database directory
    pub fn database_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.work_dir).join("database")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
