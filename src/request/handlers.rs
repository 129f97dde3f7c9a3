use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    service::RequestService,
    types::{CreateDonationRequest, RequestResponse, RequestWithDrugResponse, UpdateStatusRequest},
};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> RequestService {
    RequestService::new(
        Arc::clone(&state.request_repository),
        Arc::clone(&state.drug_repository),
    )
}

/// HTTP handler for requesting a drug
///
/// POST /api/requests (auth)
/// Returns the pending request with 201
#[instrument(name = "create_request", skip(state, claims))]
pub async fn create_request(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), AppError> {
    info!(receiver_id = %claims.user_id, drug_id = %request.drug_id, "Creating donation request");

    let created = service(&state)
        .create_request(request.drug_id, claims.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// HTTP handler for the caller's requests
///
/// GET /api/requests (auth)
#[instrument(name = "list_requests", skip(state, claims))]
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<Vec<RequestWithDrugResponse>>, AppError> {
    let requests = service(&state).list_for_receiver(claims.user_id).await?;

    info!(request_count = requests.len(), "Requests listed successfully");
    Ok(Json(requests))
}

/// HTTP handler for approving, rejecting or marking a request sent
///
/// PATCH /api/requests/:id/status (auth)
#[instrument(name = "update_request_status", skip(state, claims))]
pub async fn update_request_status(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(request_id): Path<Uuid>,
    Json(update): Json<UpdateStatusRequest>,
) -> Result<Json<RequestResponse>, AppError> {
    let updated = service(&state)
        .update_status(request_id, update.status, claims.user_id)
        .await?;

    info!(request_id = %request_id, status = %updated.status, "Request status updated");
    Ok(Json(updated))
}
