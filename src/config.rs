/// Configuration management for the Looks de Hoje backend
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
    /// Per-file size cap for image uploads, in bytes
    pub upload_limit: usize,
    /// Maximum number of files accepted by one upload request
    pub upload_max_files: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
    pub uploads_directory: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> StoreResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("LOOKS_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("LOOKS_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| StoreError::Validation("Invalid port number".to_string()))?;

        let version = env::var("LOOKS_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let upload_limit = env::var("LOOKS_UPLOAD_LIMIT")
            .unwrap_or_else(|_| "5242880".to_string())
            .parse()
            .map_err(|_| StoreError::Validation("Invalid upload limit".to_string()))?;
        let upload_max_files = env::var("LOOKS_UPLOAD_MAX_FILES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| StoreError::Validation("Invalid upload file count".to_string()))?;

        let data_directory: PathBuf = env::var("LOOKS_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("LOOKS_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("looks.sqlite"));
        let uploads_directory = env::var("LOOKS_UPLOADS_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
                upload_limit,
                upload_max_files,
            },
            storage: StorageConfig {
                data_directory,
                database,
                uploads_directory,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.service.hostname.is_empty() {
            return Err(StoreError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.service.upload_limit == 0 {
            return Err(StoreError::Validation(
                "Upload limit must be positive".to_string(),
            ));
        }

        if self.service.upload_max_files == 0 {
            return Err(StoreError::Validation(
                "Upload file count must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
