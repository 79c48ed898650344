//! Web front end: a single page plus a small JSON API.
//!
//! Each browser gets an anonymous session (cookie) holding its action
//! history and the last calendar it generated.

mod handlers;
pub mod session;
pub mod types;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::services::study::StudyService;
use session::SessionStore;

pub use handlers::DOWNLOAD_PATH;

/// Largest accepted upload, notes PDFs included
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub study: StudyService,
    pub sessions: SessionStore,
    /// Alarm offset used when the form leaves it blank
    pub default_alarm_minutes: u32,
    pub ai_configured: bool,
}

impl AppState {
    pub fn new(study: StudyService, default_alarm_minutes: u32, ai_configured: bool) -> Self {
        Self {
            study,
            sessions: SessionStore::new(),
            default_alarm_minutes,
            ai_configured,
        }
    }
}

/// Build the router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/timetable", post(handlers::timetable))
        .route(DOWNLOAD_PATH, get(handlers::download_calendar))
        .route("/api/roadmap", post(handlers::roadmap))
        .route("/api/history", get(handlers::history))
        .route("/api/reset", post(handlers::reset))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Serve on an already-bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("SmartGrind listening on http://{}", addr);
    }
    axum::serve(listener, build_router(state)).await
}

/// Bind `addr` and start the server
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    log::info!("Starting server on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}
