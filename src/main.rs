/// Looks de Hoje - Admin Backend
///
/// REST backend for the admin side of the Looks de Hoje clothing-rental
/// storefront: catalog pieces and categories, the hero banner carousel,
/// store settings, and image uploads.

mod api;
mod catalog;
mod config;
mod context;
mod db;
mod error;
mod hero;
mod server;
mod settings;
mod uploads;

use config::ServerConfig;
use context::AppContext;
use error::StoreResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> StoreResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "looks_de_hoje=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  =========================================
     Looks de Hoje - Admin Backend v{}
  =========================================
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
