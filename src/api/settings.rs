/// Store settings API endpoints
///
/// Routes live under `/api/admin` to keep the URL surface the admin
/// frontend already uses.
use crate::{
    context::AppContext,
    error::StoreResult,
    settings::{StoreSettings, StoreSettingsUpdate},
};
use axum::{extract::State, routing::get, Json, Router};

/// Build store settings API routes
pub fn routes() -> Router<AppContext> {
    Router::new().route(
        "/api/admin/settings",
        get(get_settings).put(update_settings),
    )
}

/// Store profile; 404 before the first write
async fn get_settings(State(ctx): State<AppContext>) -> StoreResult<Json<StoreSettings>> {
    let settings = ctx.settings_manager.get().await?;
    Ok(Json(settings))
}

/// Upsert the store profile
async fn update_settings(
    State(ctx): State<AppContext>,
    Json(req): Json<StoreSettingsUpdate>,
) -> StoreResult<Json<StoreSettings>> {
    let settings = ctx.settings_manager.update(req).await?;
    Ok(Json(settings))
}
