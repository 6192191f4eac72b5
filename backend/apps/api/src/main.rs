//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `pet::PetError` and `kernel::error::AppError`.

mod settings;

use axum::{
    Router,
    http::{HeaderValue, Method},
};
use pet::{JsonFileMoodRepository, pet_router};
use settings::Settings;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pusha_api=info,pet=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(pet = ?settings.pet, origin = %settings.allowed_origin, "Loaded settings");

    // Mood store
    let repo = JsonFileMoodRepository::open(&settings.state_file).await;

    // CORS configuration
    let allowed_origin: HeaderValue = settings.allowed_origin.parse()?;

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods(AllowMethods::list([Method::POST]))
        .allow_headers(AllowHeaders::any());

    // Build router
    let app = Router::new()
        .merge(pet_router(repo, settings.pet))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = settings.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
