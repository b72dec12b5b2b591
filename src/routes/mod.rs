pub mod health;
pub mod response;
pub mod template;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware::cors::permissive_cors, AppState};

/// The template API with its CORS, tracing and body-limit layers.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/template",
            get(template::get_template)
                .post(template::create_template)
                .put(template::update_template)
                .delete(template::delete_template),
        )
        .route("/response", post(response::submit_response))
        .route("/admin/responses", get(response::list_responses))
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
