/// Persistence for the hero settings document
///
/// The document is a singleton row keyed by a fixed id. Writes are
/// version-checked: every read-modify-write cycle carries the version it
/// read, and a stale writer gets a `Conflict` instead of silently
/// overwriting a concurrent update.
use super::slides::{Slide, SlideList};
use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// Fixed id of the singleton hero settings row
const HERO_SETTINGS_ID: &str = "hero";

/// Version reported for the not-yet-persisted default document; a write
/// carrying it takes the insert path.
pub const UNINITIALIZED_VERSION: i64 = 0;

/// Carousel-level settings (slides live alongside, not inside)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroSettings {
    pub is_active: bool,
    pub interval_ms: i64,
    pub background_image_url: Option<String>,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            is_active: true,
            interval_ms: 5000,
            background_image_url: None,
        }
    }
}

/// The full hero document: settings, slides, and the concurrency token
#[derive(Debug, Clone)]
pub struct HeroDocument {
    pub settings: HeroSettings,
    pub slides: SlideList,
    pub version: i64,
}

impl HeroDocument {
    /// The well-known shape returned before the first write.
    pub fn default_document() -> Self {
        Self {
            settings: HeroSettings::default(),
            slides: SlideList::new(),
            version: UNINITIALIZED_VERSION,
        }
    }
}

/// Hero settings store
#[derive(Clone)]
pub struct HeroSettingsStore {
    db: SqlitePool,
}

impl HeroSettingsStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Read the singleton document, `None` before the first write
    pub async fn read(&self) -> StoreResult<Option<HeroDocument>> {
        let row = sqlx::query(
            r#"
            SELECT is_active, interval_ms, background_image_url, slides, version
            FROM hero_setting
            WHERE id = ?
            "#,
        )
        .bind(HERO_SETTINGS_ID)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let slides_json: String = row.get("slides");
        let slides: Vec<Slide> = serde_json::from_str(&slides_json)
            .map_err(|e| StoreError::Internal(format!("Invalid slides column: {}", e)))?;

        Ok(Some(HeroDocument {
            settings: HeroSettings {
                is_active: row.get("is_active"),
                interval_ms: row.get("interval_ms"),
                background_image_url: row.get("background_image_url"),
            },
            slides: SlideList::from_stored(slides),
            version: row.get("version"),
        }))
    }

    /// Write the document, insert-or-replace guarded by `expected_version`.
    ///
    /// `UNINITIALIZED_VERSION` inserts the first row; any other value
    /// replaces only when the stored version still matches. Both paths
    /// surface `Conflict` when another writer got there first.
    pub async fn write(
        &self,
        settings: &HeroSettings,
        slides: &SlideList,
        expected_version: i64,
    ) -> StoreResult<HeroDocument> {
        let slides_json = serde_json::to_string(slides.slides())
            .map_err(|e| StoreError::Internal(format!("Slide serialization failed: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        let new_version = if expected_version == UNINITIALIZED_VERSION {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO hero_setting
                    (id, is_active, interval_ms, background_image_url, slides, version, updated_at)
                VALUES (?, ?, ?, ?, ?, 1, ?)
                "#,
            )
            .bind(HERO_SETTINGS_ID)
            .bind(settings.is_active)
            .bind(settings.interval_ms)
            .bind(&settings.background_image_url)
            .bind(&slides_json)
            .bind(&now)
            .execute(&self.db)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::Conflict(
                    "Hero settings were created concurrently".to_string(),
                ));
            }
            1
        } else {
            let result = sqlx::query(
                r#"
                UPDATE hero_setting
                SET is_active = ?,
                    interval_ms = ?,
                    background_image_url = ?,
                    slides = ?,
                    version = version + 1,
                    updated_at = ?
                WHERE id = ? AND version = ?
                "#,
            )
            .bind(settings.is_active)
            .bind(settings.interval_ms)
            .bind(&settings.background_image_url)
            .bind(&slides_json)
            .bind(&now)
            .bind(HERO_SETTINGS_ID)
            .bind(expected_version)
            .execute(&self.db)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::Conflict(
                    "Hero settings changed since they were read".to_string(),
                ));
            }
            expected_version + 1
        };

        Ok(HeroDocument {
            settings: settings.clone(),
            slides: slides.clone(),
            version: new_version,
        })
    }
}
