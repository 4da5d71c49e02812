// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact Service
//!
//! Serves the portfolio pages and the contact endpoint:
//!
//! - `GET /`, `/about`, `/projects`, `/contact`: rendered pages
//! - `POST /contact`: form post, re-renders the contact page
//! - `POST /api/contact`: JSON submission
//! - `GET /health`, `/healthz`, `/metrics`
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! read first when present):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_MAX_SUBMISSIONS`: Submissions per window per client (default: 3)
//! - `RATE_WINDOW_MS`: Counting window (default: 60000)
//! - `RATE_COOLDOWN_MS`: Cooldown once the limit trips (default: 300000)
//! - `DELIVERY_TIMEOUT_MS`: Upper bound on one delivery call (default: 15000)
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`, `EMAILJS_PUBLIC_KEY`: required
//! - `EMAILJS_ENDPOINT`, `CONTACT_TO_NAME`: optional

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_contact::{
    config::Config,
    delivery::EmailJsClient,
    handlers::{router, AppState},
    metrics::Metrics,
    pipeline::ContactPipeline,
    site::Site,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before the filter so RUST_LOG can live there too
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env");
    }
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_submissions = config.rate_limit.max_submissions,
        window_ms = config.rate_limit.window_ms,
        cooldown_ms = config.rate_limit.cooldown_ms,
        delivery_endpoint = %config.delivery.endpoint,
        "Starting portfolio contact service"
    );

    // Create application state
    let delivery = Arc::new(EmailJsClient::new(&config.delivery)?);
    let metrics = Arc::new(Metrics::new()?);
    let pipeline = ContactPipeline::new(&config, delivery, metrics.clone());

    let state = Arc::new(AppState {
        pipeline,
        site: Site::default(),
        metrics,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.pipeline.limiter().cleanup().await;
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
