use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::{RequestModel, RequestStatus},
    repository::{RequestRepository, TransitionResult},
    types::{RequestResponse, RequestWithDrugResponse},
};
use crate::{drug::repository::DrugRepository, shared::AppError};

/// Service for donation request business logic
pub struct RequestService {
    repository: Arc<dyn RequestRepository + Send + Sync>,
    drug_repository: Arc<dyn DrugRepository + Send + Sync>,
}

impl RequestService {
    pub fn new(
        repository: Arc<dyn RequestRepository + Send + Sync>,
        drug_repository: Arc<dyn DrugRepository + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            drug_repository,
        }
    }

    /// Files a pending request for `drug_id` on behalf of `receiver_id`.
    /// The drug is not looked up here.
    #[instrument(skip(self))]
    pub async fn create_request(
        &self,
        drug_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<RequestResponse, AppError> {
        let request = RequestModel::new(drug_id, receiver_id);
        self.repository.create_request(&request).await?;

        info!(request_id = %request.id, "Donation request created");
        Ok(request.into())
    }

    /// Lists the receiver's requests, each joined with its drug
    #[instrument(skip(self))]
    pub async fn list_for_receiver(
        &self,
        receiver_id: Uuid,
    ) -> Result<Vec<RequestWithDrugResponse>, AppError> {
        let requests = self.repository.list_for_receiver(receiver_id).await?;
        debug!(count = requests.len(), "Receiver requests retrieved");

        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            let drug = self.drug_repository.get_drug(request.drug_id).await?;
            if drug.is_none() {
                debug!(request_id = %request.id, drug_id = %request.drug_id, "Referenced drug missing");
            }
            responses.push(RequestWithDrugResponse::new(request, drug.map(Into::into)));
        }

        Ok(responses)
    }

    /// Moves a request to `next`. Only the donor of the requested drug may
    /// decide, and only along pending -> approved/rejected or approved -> sent.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        request_id: Uuid,
        next: RequestStatus,
        caller_id: Uuid,
    ) -> Result<RequestResponse, AppError> {
        let request = self
            .repository
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        let drug = self
            .drug_repository
            .get_drug(request.drug_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Requested drug not found".to_string()))?;

        if drug.donor_id != caller_id {
            warn!(caller_id = %caller_id, donor_id = %drug.donor_id, "Caller does not own the requested drug");
            return Err(AppError::Forbidden(
                "Only the donor of this drug can update the request".to_string(),
            ));
        }

        if !request.status.can_transition_to(next) {
            warn!(from = %request.status, to = %next, "Rejected status transition");
            return Err(AppError::InvalidTransition(format!(
                "cannot move request from {} to {}",
                request.status, next
            )));
        }

        match self
            .repository
            .transition_status(request_id, request.status, next)
            .await?
        {
            TransitionResult::Success(updated) => Ok(updated.into()),
            TransitionResult::StatusMismatch(current) => {
                Err(AppError::InvalidTransition(format!(
                    "request is now {}, cannot move to {}",
                    current, next
                )))
            }
            TransitionResult::RequestNotFound => {
                Err(AppError::NotFound("Request not found".to_string()))
            }
        }
    }
}
