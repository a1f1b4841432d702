use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{openapi, users};
use crate::config::ServerConfig;
use crate::db::repo::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/schema/openapi.json", get(openapi::openapi_json))
        .route("/users", post(users::create_user))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/profile/{user_id}", get(users::get_user_profile))
        .route(
            "/users/search/{user_type}/submit",
            post(users::search_users_submit),
        )
        .route(
            "/users/search/{user_type}/do_thing",
            post(users::search_users_do_thing),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState {
        store: UserStore::seeded(),
    });

    let app = router(state);
    let listener = TcpListener::bind(config.bind_addr).await?;

    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await
}
