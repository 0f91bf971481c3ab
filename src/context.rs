/// Application context and dependency injection
use crate::{
    catalog::{categories::CategoryManager, pieces::PieceManager},
    config::ServerConfig,
    db,
    error::{StoreError, StoreResult},
    hero::HeroManager,
    settings::StoreSettingsManager,
    uploads::UploadStore,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub hero_manager: Arc<HeroManager>,
    pub category_manager: Arc<CategoryManager>,
    pub piece_manager: Arc<PieceManager>,
    pub settings_manager: Arc<StoreSettingsManager>,
    pub upload_store: Arc<UploadStore>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> StoreResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let db = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;
        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        let hero_manager = Arc::new(HeroManager::new(db.clone()));
        let category_manager = Arc::new(CategoryManager::new(db.clone()));
        let piece_manager = Arc::new(PieceManager::new(db.clone()));
        let settings_manager = Arc::new(StoreSettingsManager::new(db.clone()));
        let upload_store = Arc::new(UploadStore::new(
            config.storage.uploads_directory.clone(),
            config.service.upload_limit,
        ));

        Ok(Self {
            config: Arc::new(config),
            db,
            hero_manager,
            category_manager,
            piece_manager,
            settings_manager,
            upload_store,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> StoreResult<()> {
        let dirs = [
            &config.storage.data_directory,
            &config.storage.uploads_directory,
        ];

        for dir in dirs {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    StoreError::Internal(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }

        Ok(())
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
