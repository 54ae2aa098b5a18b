//! Configuration module
//!
//! Env-driven configuration for the API: server, database, storage, upload
//! policy, and the Access auth gate. Loaded once at startup and validated
//! before anything else is initialized.

use std::env;

use crate::constants;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 4000;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub local_storage_path: String,
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub max_image_dimension: u32,
    /// When true, a client-supplied `exifData` multipart field is trusted
    /// instead of re-extracting on the server.
    pub parse_exif_client_side: bool,
    /// Cloudflare Access team domain, e.g. "https://myteam.cloudflareaccess.com".
    pub access_team_domain: Option<String>,
    /// Application audience (AUD) tag of the Access policy.
    pub access_policy_aud: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| constants::ALLOWED_CONTENT_TYPES.join(","))
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./data/blobs".to_string()),
            max_file_size_bytes: env::var("MAX_FILE_SIZE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(constants::MAX_FILE_SIZE_BYTES),
            allowed_content_types,
            max_image_dimension: env::var("MAX_IMAGE_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(constants::MAX_IMAGE_DIMENSION),
            parse_exif_client_side: env::var("PARSE_EXIF_CLIENT_SIDE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
            access_team_domain: env::var("ACCESS_TEAM_DOMAIN").ok().filter(|s| !s.is_empty()),
            access_policy_aud: env::var("ACCESS_POLICY_AUD").ok().filter(|s| !s.is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// The auth gate is bypassed entirely outside of production.
    pub fn auth_bypassed(&self) -> bool {
        !self.is_production()
    }

    /// Fail fast on misconfiguration before the server starts serving.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be greater than zero"));
        }
        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }
        if self.max_image_dimension == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_DIMENSION must be greater than zero"));
        }
        if self.is_production() {
            if self.access_team_domain.is_none() || self.access_policy_aud.is_none() {
                return Err(anyhow::anyhow!(
                    "ACCESS_TEAM_DOMAIN and ACCESS_POLICY_AUD must be set in production"
                ));
            }
            if self.cors_origins.iter().any(|o| o == "*") {
                return Err(anyhow::anyhow!(
                    "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
                ));
            }
        }
        Ok(())
    }
}
