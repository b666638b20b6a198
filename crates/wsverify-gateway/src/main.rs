//! wsVerify Gateway
//!
//! - Loads `wsverify.yaml` (or `$WSVERIFY_CONFIG`) with strict parsing
//! - Builds the admission pipeline; config errors stop startup
//! - Serves the WebSocket upgrade route behind the pipeline

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use wsverify_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("WSVERIFY_CONFIG").unwrap_or_else(|_| "wsverify.yaml".into());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, kind = e.kind(), error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let listen: SocketAddr = match cfg.gateway.listen.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(listen = %cfg.gateway.listen, error = %e, "gateway.listen must be a valid SocketAddr");
            return ExitCode::FAILURE;
        }
    };

    let state = match app_state::AppState::new(cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "admission pipeline init failed");
            return ExitCode::FAILURE;
        }
    };
    let app = router::build_router(state);

    tracing::info!(%listen, "wsverify-gateway starting");
    let listener = match tokio::net::TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%listen, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
