use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{RequestModel, RequestStatus};
use crate::drug::types::DrugResponse;

/// Request payload for asking for a listed drug.
/// The receiver comes from the session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub drug_id: Uuid,
}

/// Request payload for moving a request through its lifecycle
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
}

/// Response for request creation and status updates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub id: Uuid,
    pub drug_id: Uuid,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
}

impl From<RequestModel> for RequestResponse {
    fn from(model: RequestModel) -> Self {
        Self {
            id: model.id,
            drug_id: model.drug_id,
            receiver_id: model.receiver_id,
            status: model.status,
            requested_at: model.requested_at,
        }
    }
}

/// A receiver's request with the referenced drug embedded.
/// `drug` is null when the drug no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestWithDrugResponse {
    pub id: Uuid,
    pub drug_id: Uuid,
    pub drug: Option<DrugResponse>,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
}

impl RequestWithDrugResponse {
    pub fn new(model: RequestModel, drug: Option<DrugResponse>) -> Self {
        Self {
            id: model.id,
            drug_id: model.drug_id,
            drug,
            receiver_id: model.receiver_id,
            status: model.status,
            requested_at: model.requested_at,
        }
    }
}
