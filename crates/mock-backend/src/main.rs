use std::sync::Arc;

use mock_backend::{router, MockConfig, MockState};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = MockConfig::from_env();
    let state = Arc::new(MockState::new(config.fail_health));
    if config.fail_health {
        info!("/health will answer 503 (MOCK_BACKEND_FAIL_HEALTH set)");
    }

    let addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    info!(address = %addr, "mock backend listening");
    axum::serve(listener, router(state)).await.expect("server error");
}
