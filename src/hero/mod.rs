/// Hero banner carousel management
///
/// The public site shows a rotating hero banner configured by a single
/// settings document with an embedded, ordered slide list. Every mutation
/// is a read-modify-write cycle over the whole document; the version read
/// is carried into the write so racing admins surface as conflicts rather
/// than lost updates.
pub mod slides;
pub mod store;

use crate::error::{StoreError, StoreResult};
use slides::{NewSlide, Slide, SlideId, SlideList, SlidePatch};
use sqlx::SqlitePool;
use store::{HeroDocument, HeroSettings, HeroSettingsStore};

/// Hero settings manager
#[derive(Clone)]
pub struct HeroManager {
    store: HeroSettingsStore,
}

impl HeroManager {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            store: HeroSettingsStore::new(db),
        }
    }

    /// Current document, or the well-known default before the first write
    pub async fn document_or_default(&self) -> StoreResult<HeroDocument> {
        Ok(self
            .store
            .read()
            .await?
            .unwrap_or_else(HeroDocument::default_document))
    }

    async fn require_document(&self) -> StoreResult<HeroDocument> {
        self.store
            .read()
            .await?
            .ok_or_else(|| StoreError::NotFound("Hero settings not found".to_string()))
    }

    /// Replace the whole document (PUT /api/hero)
    pub async fn update_document(
        &self,
        is_active: bool,
        interval_ms: i64,
        background_image_url: Option<String>,
        slides: Vec<Slide>,
    ) -> StoreResult<HeroDocument> {
        if interval_ms <= 0 {
            return Err(StoreError::Validation(
                "interval_ms must be positive".to_string(),
            ));
        }

        let current = self.document_or_default().await?;
        let settings = HeroSettings {
            is_active,
            interval_ms,
            background_image_url,
        };
        self.store
            .write(&settings, &SlideList::from_payload(slides), current.version)
            .await
    }

    /// Append a slide to the carousel
    pub async fn append_slide(&self, new: NewSlide) -> StoreResult<(Slide, HeroDocument)> {
        let mut doc = self.document_or_default().await?;
        let slide = doc.slides.append(new)?;
        let updated = self
            .store
            .write(&doc.settings, &doc.slides, doc.version)
            .await?;
        Ok((slide, updated))
    }

    /// Merge a partial update into one slide
    pub async fn update_slide(&self, id: &SlideId, patch: SlidePatch) -> StoreResult<HeroDocument> {
        let mut doc = self.require_document().await?;
        doc.slides.update(id, patch)?;
        self.store
            .write(&doc.settings, &doc.slides, doc.version)
            .await
    }

    /// Remove one slide and close the ordering gap
    pub async fn remove_slide(&self, id: &SlideId) -> StoreResult<HeroDocument> {
        let mut doc = self.require_document().await?;
        doc.slides.remove(id)?;
        self.store
            .write(&doc.settings, &doc.slides, doc.version)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn test_manager() -> HeroManager {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        HeroManager::new(pool)
    }

    fn slide_payload(url: &str) -> NewSlide {
        NewSlide {
            image_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn default_document_before_first_write() {
        let manager = test_manager().await;
        let doc = manager.document_or_default().await.unwrap();
        assert!(doc.settings.is_active);
        assert_eq!(doc.settings.interval_ms, 5000);
        assert!(doc.slides.is_empty());
        assert_eq!(doc.version, store::UNINITIALIZED_VERSION);
    }

    #[tokio::test]
    async fn append_persists_and_orders() {
        let manager = test_manager().await;
        let (first, _) = manager
            .append_slide(slide_payload("/uploads/a.jpg"))
            .await
            .unwrap();
        let (second, doc) = manager
            .append_slide(slide_payload("/uploads/b.jpg"))
            .await
            .unwrap();

        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
        assert_eq!(doc.slides.len(), 2);
        assert_eq!(doc.version, 2);
    }

    #[tokio::test]
    async fn remove_then_update_keeps_survivor_intact() {
        let manager = test_manager().await;
        let (a, _) = manager
            .append_slide(slide_payload("/uploads/a.jpg"))
            .await
            .unwrap();
        let (b, _) = manager
            .append_slide(slide_payload("/uploads/b.jpg"))
            .await
            .unwrap();

        let doc = manager.remove_slide(&a.id).await.unwrap();
        assert_eq!(doc.slides.len(), 1);
        assert_eq!(doc.slides.slides()[0].order, 1);

        let doc = manager
            .update_slide(
                &b.id,
                SlidePatch {
                    title: Some("Featured".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let survivor = &doc.slides.slides()[0];
        assert_eq!(survivor.title, "Featured");
        assert_eq!(survivor.image_url, "/uploads/b.jpg");
        assert_eq!(survivor.order, 1);
    }

    #[tokio::test]
    async fn slide_mutations_on_missing_document_are_not_found() {
        let manager = test_manager().await;
        let err = manager
            .update_slide(&SlideId::new("1"), SlidePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = manager.remove_slide(&SlideId::new("1")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_document_rejects_bad_interval() {
        let manager = test_manager().await;
        let err = manager
            .update_document(true, 0, None, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn update_document_normalizes_caller_orders() {
        let manager = test_manager().await;
        let (a, _) = manager
            .append_slide(slide_payload("/uploads/a.jpg"))
            .await
            .unwrap();
        let (b, _) = manager
            .append_slide(slide_payload("/uploads/b.jpg"))
            .await
            .unwrap();

        // Swap the carousel by sending inverted sort keys.
        let mut swapped_a = a.clone();
        swapped_a.order = 20;
        let mut swapped_b = b.clone();
        swapped_b.order = 10;

        let doc = manager
            .update_document(false, 8000, None, vec![swapped_a, swapped_b])
            .await
            .unwrap();

        assert!(!doc.settings.is_active);
        assert_eq!(doc.settings.interval_ms, 8000);
        let seen: Vec<(&str, i64)> = doc
            .slides
            .slides()
            .iter()
            .map(|s| (s.id.as_str(), s.order))
            .collect();
        assert_eq!(seen, vec![(b.id.as_str(), 1), (a.id.as_str(), 2)]);
    }

    #[tokio::test]
    async fn racing_cycles_surface_conflict() {
        let manager = test_manager().await;
        manager
            .append_slide(slide_payload("/uploads/a.jpg"))
            .await
            .unwrap();

        // Both cycles read the same base document.
        let base = manager.document_or_default().await.unwrap();

        let mut first = base.clone();
        first.slides.append(slide_payload("/uploads/b.jpg")).unwrap();
        manager
            .store
            .write(&first.settings, &first.slides, first.version)
            .await
            .unwrap();

        let mut second = base.clone();
        second.slides.append(slide_payload("/uploads/c.jpg")).unwrap();
        let err = manager
            .store
            .write(&second.settings, &second.slides, second.version)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
