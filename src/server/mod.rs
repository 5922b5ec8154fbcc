pub mod handlers;
pub mod types;

use crate::{Result, chat::ChatProxy, config::Config, feedback::FeedbackStorage};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/api/ratings",
            get(handlers::rating_summary).post(handlers::create_rating),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let feedback = FeedbackStorage::new(&config.server.database_path).await?;
    let proxy = ChatProxy::from_config(&config.inference)?;

    let app_state = AppState {
        proxy: Arc::new(proxy),
        feedback: Arc::new(feedback),
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
