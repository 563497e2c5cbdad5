//! replaykit gateway
//!
//! - `POST /to_single_python_request` : one edited request -> `requests` script
//! - `POST /to_python_request`        : whole flow -> `requests` session script
//! - `POST /to_pwn`                   : whole flow -> pwntools script
//!
//! Usage: `replaykit-gateway [config.yaml]` (default `replaykit.yaml`).

use tracing_subscriber::{fmt, EnvFilter};

use replaykit_gateway::{app_state, config, router, Result};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "replaykit-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "replaykit.yaml".to_string());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "replaykit-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
