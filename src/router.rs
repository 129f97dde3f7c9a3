use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    drug, request, session,
    shared::AppState,
    upload::{self, UPLOAD_URL_PREFIX},
    user,
};

/// Builds the full HTTP surface.
///
/// Protected handlers get the JWT layer per method so that `GET /api/drugs`
/// stays public while `POST /api/drugs` requires a token.
pub fn create_router(state: AppState) -> Router {
    let require_auth = middleware::from_fn_with_state(state.clone(), session::jwt_auth);
    let upload_limit = match state.upload_store.max_bytes() {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/api/register", post(user::register))
        .route("/api/login", post(user::login))
        .route(
            "/api/drugs",
            get(drug::list_drugs).merge(post(drug::create_drug).route_layer(require_auth.clone())),
        )
        .route("/api/search", get(drug::search_drugs))
        .route("/api/upload", post(upload::upload_file).layer(upload_limit))
        .route(
            "/api/requests",
            post(request::create_request)
                .get(request::list_requests)
                .route_layer(require_auth.clone()),
        )
        .route(
            "/api/requests/:id/status",
            patch(request::update_request_status).route_layer(require_auth),
        )
        .nest_service(
            UPLOAD_URL_PREFIX,
            ServeDir::new(state.upload_store.dir().to_path_buf()),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
