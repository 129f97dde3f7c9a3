use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::CredentialService,
    types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
};
use crate::shared::{AppError, AppState};

/// HTTP handler for registering a new user
///
/// POST /api/register
#[instrument(name = "register", skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    info!("Registering new user");

    let service = CredentialService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
    );
    let response = service.register(request).await?;

    Ok(Json(response))
}

/// HTTP handler for logging in
///
/// POST /api/login
/// Returns a signed token for use as `Authorization: Bearer <token>`
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = CredentialService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
    );
    let response = service.login(request).await?;

    info!("Login succeeded");
    Ok(Json(response))
}
