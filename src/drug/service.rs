use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    models::DrugModel,
    repository::DrugRepository,
    types::{CreateDrugRequest, DrugResponse},
};
use crate::shared::AppError;

/// Service for drug listing business logic
pub struct DrugService {
    repository: Arc<dyn DrugRepository + Send + Sync>,
}

impl DrugService {
    pub fn new(repository: Arc<dyn DrugRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Lists a new drug owned by `donor_id`. It starts unverified.
    #[instrument(skip(self, request))]
    pub async fn create_drug(
        &self,
        request: CreateDrugRequest,
        donor_id: Uuid,
    ) -> Result<DrugResponse, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }

        let drug = DrugModel::new(
            request.name,
            request.dosage,
            request.expiry_date,
            request.condition,
            request.image_url,
            donor_id,
        );
        self.repository.create_drug(&drug).await?;

        info!(drug_id = %drug.id, donor_id = %donor_id, "Drug listed");
        Ok(drug.into())
    }

    /// Public listing: verified drugs that have not expired
    #[instrument(skip(self))]
    pub async fn list_available(&self) -> Result<Vec<DrugResponse>, AppError> {
        let drugs = self.repository.list_available(Utc::now()).await?;
        debug!(count = drugs.len(), "Available drugs retrieved");
        Ok(drugs.into_iter().map(DrugResponse::from).collect())
    }

    /// Name search across all listings. An empty query matches everything.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<DrugResponse>, AppError> {
        let drugs = self.repository.search_by_name(query).await?;
        debug!(count = drugs.len(), "Drug search completed");
        Ok(drugs.into_iter().map(DrugResponse::from).collect())
    }
}
