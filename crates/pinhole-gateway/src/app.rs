use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, info_handler, ping_handler, redirect_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/ping", get(ping_handler))
            .route("/x", post(create_url_handler))
            .route("/x/{code}", get(redirect_handler))
            .route("/info/{code}", get(info_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
