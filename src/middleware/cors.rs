use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Any origin, the methods of the template API, any request header.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(Any)
}
