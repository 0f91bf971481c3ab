/// Hero banner API endpoints
use crate::{
    context::AppContext,
    error::{StoreError, StoreResult},
    hero::slides::{NewSlide, Slide, SlideId, SlidePatch},
    hero::store::{HeroDocument, HeroSettings},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build hero API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/hero", get(get_hero).put(update_hero))
        .route("/api/hero/slides", post(create_slide))
        .route(
            "/api/hero/slides/:id",
            put(update_slide).delete(delete_slide),
        )
}

/// Hero document as the admin frontend consumes it: carousel settings
/// next to the slide list, slides appearing exactly once.
#[derive(Debug, Serialize)]
struct HeroView {
    settings: HeroSettings,
    slides: Vec<Slide>,
}

impl From<HeroDocument> for HeroView {
    fn from(doc: HeroDocument) -> Self {
        Self {
            slides: doc.slides.slides().to_vec(),
            settings: doc.settings,
        }
    }
}

/// Current hero settings; a default-shaped document before the first write
async fn get_hero(State(ctx): State<AppContext>) -> StoreResult<Json<HeroView>> {
    let doc = ctx.hero_manager.document_or_default().await?;
    Ok(Json(doc.into()))
}

#[derive(Debug, Deserialize)]
struct UpdateHeroRequest {
    is_active: Option<bool>,
    interval_ms: Option<i64>,
    background_image_url: Option<String>,
    slides: Option<Vec<Slide>>,
}

/// Replace the whole hero document
async fn update_hero(
    State(ctx): State<AppContext>,
    Json(req): Json<UpdateHeroRequest>,
) -> StoreResult<Json<HeroView>> {
    let is_active = req
        .is_active
        .ok_or_else(|| StoreError::Validation("is_active is required".to_string()))?;
    let interval_ms = req
        .interval_ms
        .ok_or_else(|| StoreError::Validation("interval_ms is required".to_string()))?;
    let slides = req
        .slides
        .ok_or_else(|| StoreError::Validation("slides is required".to_string()))?;

    let doc = ctx
        .hero_manager
        .update_document(is_active, interval_ms, req.background_image_url, slides)
        .await?;
    Ok(Json(doc.into()))
}

#[derive(Debug, Serialize)]
struct CreateSlideResponse {
    slide: Slide,
    #[serde(rename = "updatedHero")]
    updated_hero: HeroView,
}

/// Append a slide to the carousel
async fn create_slide(
    State(ctx): State<AppContext>,
    Json(req): Json<NewSlide>,
) -> StoreResult<(StatusCode, Json<CreateSlideResponse>)> {
    let (slide, doc) = ctx.hero_manager.append_slide(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSlideResponse {
            slide,
            updated_hero: doc.into(),
        }),
    ))
}

/// Merge a partial update into one slide
async fn update_slide(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<SlidePatch>,
) -> StoreResult<Json<HeroView>> {
    let doc = ctx
        .hero_manager
        .update_slide(&SlideId::new(id), req)
        .await?;
    Ok(Json(doc.into()))
}

/// Remove one slide
async fn delete_slide(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> StoreResult<Json<HeroView>> {
    let doc = ctx.hero_manager.remove_slide(&SlideId::new(id)).await?;
    Ok(Json(doc.into()))
}
