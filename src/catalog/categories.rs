/// Category management
use super::slug::slugify;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Catalog category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Partial update for an existing category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Category manager
#[derive(Clone)]
pub struct CategoryManager {
    db: SqlitePool,
}

impl CategoryManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all categories, name ascending
    pub async fn list(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, slug, is_active, created_at
            FROM category
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(map_row).collect()
    }

    /// Get one category by id
    pub async fn get(&self, id: &str) -> StoreResult<Category> {
        let row = sqlx::query(
            r#"
            SELECT id, name, slug, is_active, created_at
            FROM category
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Category {} not found", id)))?;

        map_row(&row)
    }

    /// Create a category; the slug is derived from the name
    pub async fn create(&self, new: NewCategory) -> StoreResult<Category> {
        let name = match new.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return Err(StoreError::Validation("name is required".to_string())),
        };

        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(StoreError::Validation(
                "name must contain letters or digits".to_string(),
            ));
        }
        self.ensure_slug_free(&slug, None).await?;

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            is_active: new.is_active.unwrap_or(true),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO category (id, name, slug, is_active, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.is_active)
        .bind(category.created_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(category)
    }

    /// Apply a partial update; renaming regenerates the slug
    pub async fn update(&self, id: &str, patch: CategoryPatch) -> StoreResult<Category> {
        let mut category = self.get(id).await?;

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(StoreError::Validation("name cannot be empty".to_string()));
            }
            let slug = slugify(&name);
            if slug.is_empty() {
                return Err(StoreError::Validation(
                    "name must contain letters or digits".to_string(),
                ));
            }
            self.ensure_slug_free(&slug, Some(id)).await?;
            category.name = name;
            category.slug = slug;
        }
        if let Some(is_active) = patch.is_active {
            category.is_active = is_active;
        }

        sqlx::query(
            r#"
            UPDATE category
            SET name = ?, slug = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.is_active)
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(category)
    }

    /// Delete a category; refused while pieces still reference it
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let piece_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM piece WHERE category_id = ?")
                .bind(id)
                .fetch_one(&self.db)
                .await?;
        if piece_count > 0 {
            return Err(StoreError::Conflict(format!(
                "Category has {} piece(s); move or delete them first",
                piece_count
            )));
        }

        let result = sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Category {} not found", id)));
        }

        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, exclude_id: Option<&str>) -> StoreResult<()> {
        let existing: Option<String> = sqlx::query_scalar("SELECT id FROM category WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.db)
            .await?;

        match existing {
            Some(id) if exclude_id != Some(id.as_str()) => Err(StoreError::Conflict(format!(
                "A category with slug '{}' already exists",
                slug
            ))),
            _ => Ok(()),
        }
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> StoreResult<Category> {
    let created_at_str: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| StoreError::Internal(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc);

    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        is_active: row.get("is_active"),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn test_manager() -> CategoryManager {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        CategoryManager::new(pool)
    }

    fn named(name: &str) -> NewCategory {
        NewCategory {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_generates_slug_and_defaults_active() {
        let manager = test_manager().await;
        let category = manager.create(named("Vestidos de Festa")).await.unwrap();
        assert_eq!(category.slug, "vestidos-de-festa");
        assert!(category.is_active);
    }

    #[tokio::test]
    async fn create_without_name_is_rejected() {
        let manager = test_manager().await;
        let err = manager.create(NewCategory::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let manager = test_manager().await;
        manager.create(named("Calçados")).await.unwrap();
        // Different display name, same slug after folding.
        let err = manager.create(named("calcados")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn rename_regenerates_slug_and_skips_self_conflict() {
        let manager = test_manager().await;
        let category = manager.create(named("Bolsas")).await.unwrap();

        // Same name again must not conflict with itself.
        let same = manager
            .update(
                &category.id,
                CategoryPatch {
                    name: Some("Bolsas".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.slug, "bolsas");

        let renamed = manager
            .update(
                &category.id,
                CategoryPatch {
                    name: Some("Bolsas e Clutches".to_string()),
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "bolsas-e-clutches");
        assert!(!renamed.is_active);
    }

    #[tokio::test]
    async fn list_is_name_ascending() {
        let manager = test_manager().await;
        manager.create(named("Saias")).await.unwrap();
        manager.create(named("Acessórios")).await.unwrap();
        manager.create(named("Macacões")).await.unwrap();

        let names: Vec<String> = manager
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Acessórios", "Macacões", "Saias"]);
    }

    #[tokio::test]
    async fn delete_missing_category_is_not_found() {
        let manager = test_manager().await;
        let err = manager.delete("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
