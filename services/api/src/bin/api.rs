//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemorySessionStore, MongoReviewStore, OpenAiReviewAnalyzer},
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use mongodb::{bson::doc, options::ClientOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to MongoDB & Ensure Indexes ---
    info!("Connecting to MongoDB...");
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.server_selection_timeout = Some(Duration::from_secs(5));
    let mongo_client = mongodb::Client::with_options(client_options)?;
    let db = mongo_client.database(&config.mongodb_db_name);
    db.run_command(doc! { "ping": 1 }).await?;
    info!("Connected to MongoDB database: {}", config.mongodb_db_name);

    let store = Arc::new(MongoReviewStore::new(&db));
    store.ensure_indexes().await?;

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());
    let openai_client = Client::with_config(openai_config);
    let analyzer = Arc::new(OpenAiReviewAnalyzer::new(
        openai_client,
        config.llm_model.clone(),
        config.llm_timeout,
    ));

    let sessions = Arc::new(InMemorySessionStore::new(config.session_expire_hours));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        analyzer,
        sessions,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/api/docs",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
