/// Piece (inventory item) management
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Longest accepted piece description, in characters
const DESCRIPTION_MAX_CHARS: usize = 350;

/// Rental status of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceStatus {
    Available,
    Rented,
}

impl PieceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceStatus::Available => "available",
            PieceStatus::Rented => "rented",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(PieceStatus::Available),
            "rented" => Some(PieceStatus::Rented),
            _ => None,
        }
    }

    // Anything that is not explicitly "available" counts as rented,
    // matching how the storefront has always interpreted the field.
    fn derive(token: Option<&str>) -> Self {
        match token {
            Some("available") => PieceStatus::Available,
            _ => PieceStatus::Rented,
        }
    }
}

/// One image attached to a piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceImage {
    pub url: String,
}

/// Category fields echoed alongside a piece
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Inventory piece, joined with its category
#[derive(Debug, Clone, Serialize)]
pub struct Piece {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub status: PieceStatus,
    pub category_id: String,
    /// First image url, denormalized for list views
    pub image_url: Option<String>,
    pub images: Vec<PieceImage>,
    pub measurements: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub category: CategorySummary,
}

/// Fields accepted when creating a piece
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPiece {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub images: Option<Vec<PieceImage>>,
    pub measurements: Option<serde_json::Value>,
}

/// Partial update for an existing piece
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PiecePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub images: Option<Vec<PieceImage>>,
    pub measurements: Option<serde_json::Value>,
}

/// Piece manager
#[derive(Clone)]
pub struct PieceManager {
    db: SqlitePool,
}

impl PieceManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all pieces with their categories, newest first
    pub async fn list(&self) -> StoreResult<Vec<Piece>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY p.created_at DESC",
            SELECT_PIECE_WITH_CATEGORY
        ))
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(map_row).collect()
    }

    /// Get one piece by id
    pub async fn get(&self, id: &str) -> StoreResult<Piece> {
        let row = sqlx::query(&format!("{} WHERE p.id = ?", SELECT_PIECE_WITH_CATEGORY))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Piece {} not found", id)))?;

        map_row(&row)
    }

    /// Create a piece
    pub async fn create(&self, new: NewPiece) -> StoreResult<Piece> {
        let name = match new.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(StoreError::Validation("name is required".to_string())),
        };
        let price = new
            .price
            .ok_or_else(|| StoreError::Validation("price is required".to_string()))?;
        let category_id = new
            .category_id
            .ok_or_else(|| StoreError::Validation("category_id is required".to_string()))?;
        let images = match new.images {
            Some(images) if !images.is_empty() => images,
            _ => {
                return Err(StoreError::Validation(
                    "at least one image is required".to_string(),
                ))
            }
        };
        validate_description(new.description.as_deref())?;
        self.ensure_category_exists(&category_id).await?;

        let id = Uuid::new_v4().to_string();
        let status = PieceStatus::derive(new.status.as_deref());
        let image_url = images.first().map(|img| img.url.clone());
        let images_json = serde_json::to_string(&images)
            .map_err(|e| StoreError::Internal(format!("Image serialization failed: {}", e)))?;
        let measurements_json = encode_measurements(new.measurements.as_ref())?;
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO piece
                (id, name, description, price, status, category_id, image_url, images, measurements, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&name)
        .bind(&new.description)
        .bind(price)
        .bind(status.as_str())
        .bind(&category_id)
        .bind(&image_url)
        .bind(&images_json)
        .bind(&measurements_json)
        .bind(created_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        self.get(&id).await
    }

    /// Apply a partial update; replacing images re-derives `image_url`
    pub async fn update(&self, id: &str, patch: PiecePatch) -> StoreResult<Piece> {
        let current = self.get(id).await?;

        let name = match patch.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            Some(_) => return Err(StoreError::Validation("name cannot be empty".to_string())),
            None => current.name,
        };
        let description = match patch.description {
            Some(description) => {
                validate_description(Some(&description))?;
                Some(description)
            }
            None => current.description,
        };
        let price = patch.price.unwrap_or(current.price);
        let status = match patch.status.as_deref() {
            Some(token) => PieceStatus::derive(Some(token)),
            None => current.status,
        };
        let category_id = match patch.category_id {
            Some(category_id) => {
                self.ensure_category_exists(&category_id).await?;
                category_id
            }
            None => current.category_id,
        };
        let (images, image_url) = match patch.images {
            Some(images) => {
                let image_url = images.first().map(|img| img.url.clone());
                (images, image_url)
            }
            None => (current.images, current.image_url),
        };
        let measurements = match patch.measurements {
            Some(measurements) => Some(measurements),
            None => current.measurements,
        };

        let images_json = serde_json::to_string(&images)
            .map_err(|e| StoreError::Internal(format!("Image serialization failed: {}", e)))?;
        let measurements_json = encode_measurements(measurements.as_ref())?;

        sqlx::query(
            r#"
            UPDATE piece
            SET name = ?, description = ?, price = ?, status = ?, category_id = ?,
                image_url = ?, images = ?, measurements = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(status.as_str())
        .bind(&category_id)
        .bind(&image_url)
        .bind(&images_json)
        .bind(&measurements_json)
        .bind(id)
        .execute(&self.db)
        .await?;

        self.get(id).await
    }

    /// Set the rental status to the supplied final value
    pub async fn toggle_status(&self, id: &str, status: Option<&str>) -> StoreResult<Piece> {
        let status = status
            .and_then(PieceStatus::from_str)
            .ok_or_else(|| {
                StoreError::Validation("status must be 'available' or 'rented'".to_string())
            })?;

        let result = sqlx::query("UPDATE piece SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Piece {} not found", id)));
        }

        self.get(id).await
    }

    /// Delete a piece
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM piece WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Piece {} not found", id)));
        }

        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: &str) -> StoreResult<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE id = ?")
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;
        if count == 0 {
            return Err(StoreError::Validation(format!(
                "category_id {} does not reference an existing category",
                category_id
            )));
        }
        Ok(())
    }
}

const SELECT_PIECE_WITH_CATEGORY: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.status, p.category_id,
           p.image_url, p.images, p.measurements, p.created_at,
           c.name AS category_name, c.slug AS category_slug
    FROM piece p
    JOIN category c ON c.id = p.category_id
"#;

fn validate_description(description: Option<&str>) -> StoreResult<()> {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(StoreError::Validation(format!(
                "description must be at most {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }
    }
    Ok(())
}

fn encode_measurements(measurements: Option<&serde_json::Value>) -> StoreResult<Option<String>> {
    measurements
        .map(|value| {
            serde_json::to_string(value)
                .map_err(|e| StoreError::Internal(format!("Measurement serialization failed: {}", e)))
        })
        .transpose()
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Piece> {
    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| StoreError::Internal(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc);

    let status_str: String = row.get("status");
    let status = PieceStatus::from_str(&status_str)
        .ok_or_else(|| StoreError::Internal(format!("Invalid piece status: {}", status_str)))?;

    let images_json: String = row.get("images");
    let images: Vec<PieceImage> = serde_json::from_str(&images_json)
        .map_err(|e| StoreError::Internal(format!("Invalid images column: {}", e)))?;

    let measurements = row
        .try_get::<Option<String>, _>("measurements")?
        .map(|s| {
            serde_json::from_str(&s)
                .map_err(|e| StoreError::Internal(format!("Invalid measurements column: {}", e)))
        })
        .transpose()?;

    Ok(Piece {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        status,
        category_id: row.get("category_id"),
        image_url: row.get("image_url"),
        images,
        measurements,
        created_at,
        category: CategorySummary {
            id: row.get("category_id"),
            name: row.get("category_name"),
            slug: row.get("category_slug"),
        },
    })
}
