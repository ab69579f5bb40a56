use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use tally::api::create_router;
use tally::config::Config;
use tally::storage::{EventStore, SqliteEventStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Using SQLite storage: {}", config.database.url);
    let store: Arc<dyn EventStore> = Arc::new(
        SqliteEventStore::new(&config.database.url, config.database.max_connections).await?,
    );

    info!("Initializing database...");
    store.init().await?;
    info!("Database initialized successfully");

    // Create router
    let router = create_router(Arc::clone(&store), config.frontend.clone());

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving dashboard from directory: {}", static_dir);
    }

    // Start server; connect-info is needed for the client-IP fallback
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Analytics server listening on http://{}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
