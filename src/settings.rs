/// Store profile settings
///
/// A second singleton row, separate from the hero document: the store
/// name and contact links shown on the public site.
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// Fixed id of the singleton store settings row
const STORE_SETTINGS_ID: &str = "settings";

/// Store profile shown on the public site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub store_name: String,
    pub instagram_url: Option<String>,
    pub whatsapp_url: Option<String>,
    pub email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when updating the store profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettingsUpdate {
    pub store_name: Option<String>,
    pub instagram_url: Option<String>,
    pub whatsapp_url: Option<String>,
    pub email: Option<String>,
}

/// Store settings manager
#[derive(Clone)]
pub struct StoreSettingsManager {
    db: SqlitePool,
}

impl StoreSettingsManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get the store profile; `NotFound` before the first write
    pub async fn get(&self) -> StoreResult<StoreSettings> {
        let row = sqlx::query(
            r#"
            SELECT store_name, instagram_url, whatsapp_url, email, updated_at
            FROM store_setting
            WHERE id = ?
            "#,
        )
        .bind(STORE_SETTINGS_ID)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::NotFound("Store settings not found".to_string()))?;

        let updated_at_str: String = row.get("updated_at");
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| StoreError::Internal(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoreSettings {
            store_name: row.get("store_name"),
            instagram_url: row.get("instagram_url"),
            whatsapp_url: row.get("whatsapp_url"),
            email: row.get("email"),
            updated_at,
        })
    }

    /// Upsert the store profile; creates the row on first write
    pub async fn update(&self, update: StoreSettingsUpdate) -> StoreResult<StoreSettings> {
        let store_name = match update.store_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => {
                return Err(StoreError::Validation(
                    "store_name is required".to_string(),
                ))
            }
        };

        let updated_at = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO store_setting (id, store_name, instagram_url, whatsapp_url, email, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                store_name = excluded.store_name,
                instagram_url = excluded.instagram_url,
                whatsapp_url = excluded.whatsapp_url,
                email = excluded.email,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(STORE_SETTINGS_ID)
        .bind(&store_name)
        .bind(&update.instagram_url)
        .bind(&update.whatsapp_url)
        .bind(&update.email)
        .bind(updated_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(StoreSettings {
            store_name,
            instagram_url: update.instagram_url,
            whatsapp_url: update.whatsapp_url,
            email: update.email,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn test_manager() -> StoreSettingsManager {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        StoreSettingsManager::new(pool)
    }

    #[tokio::test]
    async fn get_before_first_write_is_not_found() {
        let manager = test_manager().await;
        assert!(matches!(
            manager.get().await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn update_creates_then_replaces_the_row() {
        let manager = test_manager().await;

        manager
            .update(StoreSettingsUpdate {
                store_name: Some("Looks de Hoje".to_string()),
                instagram_url: Some("https://instagram.com/looksdehoje".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let settings = manager.get().await.unwrap();
        assert_eq!(settings.store_name, "Looks de Hoje");
        assert!(settings.whatsapp_url.is_none());

        // A second write replaces the whole profile.
        manager
            .update(StoreSettingsUpdate {
                store_name: Some("Looks de Hoje Alugueis".to_string()),
                whatsapp_url: Some("https://wa.me/5511999999999".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let settings = manager.get().await.unwrap();
        assert_eq!(settings.store_name, "Looks de Hoje Alugueis");
        assert!(settings.instagram_url.is_none());
        assert_eq!(
            settings.whatsapp_url.as_deref(),
            Some("https://wa.me/5511999999999")
        );
    }

    #[tokio::test]
    async fn update_without_store_name_is_rejected() {
        let manager = test_manager().await;
        let err = manager
            .update(StoreSettingsUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
