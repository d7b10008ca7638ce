use axum::{
    http::{header, HeaderValue},
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{auth, chat, health, todos};
use crate::state::AppState;

/// Builds the application router with every route and middleware layer
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/profile", get(auth::profile))
        // Todo routes
        .route("/api/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/api/todos/:id",
            put(todos::update_todo).delete(todos::delete_todo),
        )
        .route("/api/todos/:id/toggle", patch(todos::toggle_todo))
        // Chat routes
        .route(
            "/api/chat",
            get(chat::list_conversations).post(chat::send_message),
        )
        .route("/api/chat/:id", get(chat::get_conversation))
        // Middleware
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
