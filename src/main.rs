use campus_rooms::{
    app,
    database::{create_pool, DbFacade, InMemoryDbFacade, PostgresDbFacade},
    AppConfig, AppState,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_rooms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting campus rooms API");

    let config = AppConfig::from_env()?;

    // Pick the facade once; handlers only see the trait
    let db: Arc<dyn DbFacade + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url, config.db_max_connections).await?;
            let facade = PostgresDbFacade::new(pool);
            facade.migrate().await?;
            info!(max_connections = config.db_max_connections, "Using PostgreSQL database");
            Arc::new(facade)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory database");
            Arc::new(InMemoryDbFacade::new())
        }
    };

    let app = app(AppState::new(db)).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
