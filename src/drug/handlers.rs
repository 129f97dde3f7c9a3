use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::DrugService,
    types::{CreateDrugRequest, DrugResponse, SearchQuery},
};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

/// HTTP handler for listing a drug for donation
///
/// POST /api/drugs (auth)
/// Returns the created drug with 201
#[instrument(name = "create_drug", skip(state, claims, request))]
pub async fn create_drug(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<CreateDrugRequest>,
) -> Result<(StatusCode, Json<DrugResponse>), AppError> {
    info!(donor_id = %claims.user_id, name = %request.name, "Creating drug listing");

    let service = DrugService::new(Arc::clone(&state.drug_repository));
    let drug = service.create_drug(request, claims.user_id).await?;

    Ok((StatusCode::CREATED, Json(drug)))
}

/// HTTP handler for the public listing
///
/// GET /api/drugs
/// Returns verified drugs that have not expired
#[instrument(name = "list_drugs", skip(state))]
pub async fn list_drugs(
    State(state): State<AppState>,
) -> Result<Json<Vec<DrugResponse>>, AppError> {
    let service = DrugService::new(Arc::clone(&state.drug_repository));
    let drugs = service.list_available().await?;

    info!(drug_count = drugs.len(), "Drugs listed successfully");
    Ok(Json(drugs))
}

/// HTTP handler for name search
///
/// GET /api/search?q=
#[instrument(name = "search_drugs", skip(state))]
pub async fn search_drugs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<DrugResponse>>, AppError> {
    let service = DrugService::new(Arc::clone(&state.drug_repository));
    let drugs = service.search(query.q.as_deref().unwrap_or_default()).await?;

    info!(drug_count = drugs.len(), "Drug search served");
    Ok(Json(drugs))
}
