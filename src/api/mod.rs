/// API routes and handlers
pub mod categories;
pub mod hero;
pub mod pieces;
pub mod settings;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(hero::routes())
        .merge(pieces::routes())
        .merge(categories::routes())
        .merge(settings::routes())
}
