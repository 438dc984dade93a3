//! CareView response service
//!
//! Serves the patient reply endpoint plus the static case and rubric lists.

use careview::api::{create_router, AppState};
use careview::chat::ChatService;
use careview::llm::{LlmConfig, API_KEY_VAR};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "careview=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("CAREVIEW_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let llm_config = LlmConfig::from_env();
    let chat = ChatService::from_config(&llm_config);

    if chat.is_configured() {
        tracing::info!(
            model = %llm_config.chat_model,
            base_url = %llm_config.base_url,
            speech = chat.speech_enabled(),
            "Response service configured"
        );
    } else {
        // Not fatal: every chat request reports the configuration error
        tracing::warn!("{API_KEY_VAR} is not set. Chat requests will fail until it is provided.");
    }

    let state = AppState::new(chat);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("CareView server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
