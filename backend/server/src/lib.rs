//! Documentation of the CarConnect aggregator backend.
//!
//!
//!
//! # General Infrastructure
//! - Frontend never talks to Google APIs directly, it only knows this server
//! - This server holds every credential and fans one request out to three providers
//! - Gemini `generateContent` supplies the structured facts record
//! - Programmable Search supplies exterior photo URLs
//! - YouTube Data API supplies review videos
//! - Whatever fails is dropped from the merged response, the request itself still succeeds
//!
//!
//!
//! # Protecting the Paid APIs
//!
//! **Goal**: One public endpoint backed by three metered APIs must not be an
//! open relay for someone else's quota burn.
//!
//! - Per IP fixed window rate limit, 30 requests per 15 minutes by default
//! - CORS locked to the single configured frontend origin
//! - Model queries are sanitized and truncated before they reach any prompt
//! - Provider calls share one HTTP client with a hard timeout
//!
//!
//!
//! # Notes
//!
//! ## Degradation over failure
//! The generative payload is the heart of the response, so a missing Gemini
//! credential is the one per-request hard failure. Everything else, timeouts,
//! quota errors, unparsable completions, degrades to empty fields. The
//! frontend renders whatever arrived and hides the rest.
//!
//! ## Completion parsing
//! Gemini is asked for `application/json` but completions still arrive
//! fenced or wrapped in prose often enough that the contract crate parses
//! them leniently, field by field. See `contract::parse`.
//!
//!
//!
//! # Setup
//!
//! Run locally against real APIs.
//! ```sh
//! GEMINI_API_KEY=... YOUTUBE_API_KEY=... RUST_LOG=info cargo run -p backend
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Configuration is environment driven, see [`config::Config`]. Credentials
//! come from Docker secrets in deployment and plain variables locally.
use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::post,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod aggregate;
pub mod config;
pub mod error;
pub mod providers;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod utils;

use config::DEFAULT_FRONTEND_ORIGIN;
use contract::FETCH_CAR_DETAILS_PATH;
use routes::fetch_car_details_handler;
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");

    let origin = state
        .config
        .frontend_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| {
            warn!("Invalid FRONTEND_URL, falling back to {DEFAULT_FRONTEND_ORIGIN}");
            HeaderValue::from_static(DEFAULT_FRONTEND_ORIGIN)
        });

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route(FETCH_CAR_DETAILS_PATH, post(fetch_car_details_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
