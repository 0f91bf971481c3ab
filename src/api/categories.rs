/// Category API endpoints
use crate::{
    catalog::categories::{Category, CategoryPatch, NewCategory},
    context::AppContext,
    error::StoreResult,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

/// Build category API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// All categories, name ascending
async fn list_categories(State(ctx): State<AppContext>) -> StoreResult<Json<Vec<Category>>> {
    let categories = ctx.category_manager.list().await?;
    Ok(Json(categories))
}

/// One category by id
async fn get_category(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> StoreResult<Json<Category>> {
    let category = ctx.category_manager.get(&id).await?;
    Ok(Json(category))
}

/// Create a category
async fn create_category(
    State(ctx): State<AppContext>,
    Json(req): Json<NewCategory>,
) -> StoreResult<(StatusCode, Json<Category>)> {
    let category = ctx.category_manager.create(req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Apply a partial update to a category
async fn update_category(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<CategoryPatch>,
) -> StoreResult<Json<Category>> {
    let category = ctx.category_manager.update(&id, req).await?;
    Ok(Json(category))
}

/// Delete a category (refused while pieces reference it)
async fn delete_category(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> StoreResult<StatusCode> {
    ctx.category_manager.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
