use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::models::{RequestModel, RequestStatus};
use crate::shared::AppError;

/// Result of attempting a status change
#[derive(Debug, Clone)]
pub enum TransitionResult {
    /// Status changed, returns updated request data
    Success(RequestModel),
    /// Request was no longer in the expected status; carries the current one
    StatusMismatch(RequestStatus),
    /// Request does not exist
    RequestNotFound,
}

/// Trait for donation request repository operations
#[async_trait]
pub trait RequestRepository {
    async fn create_request(&self, request: &RequestModel) -> Result<(), AppError>;
    async fn get_request(&self, request_id: Uuid) -> Result<Option<RequestModel>, AppError>;

    /// All requests made by a receiver, oldest first
    async fn list_for_receiver(&self, receiver_id: Uuid) -> Result<Vec<RequestModel>, AppError>;

    /// Atomically moves a request from `expected` to `next`.
    /// Concurrent updates cannot both succeed from the same starting status.
    async fn transition_status(
        &self,
        request_id: Uuid,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> Result<TransitionResult, AppError>;
}

/// In-memory implementation of RequestRepository for development and testing
pub struct InMemoryRequestRepository {
    requests: Mutex<HashMap<Uuid, RequestModel>>,
}

impl Default for InMemoryRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRequestRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    #[instrument(skip(self, request))]
    async fn create_request(&self, request: &RequestModel) -> Result<(), AppError> {
        debug!(request_id = %request.id, drug_id = %request.drug_id, "Creating request in memory");

        let mut requests = self.requests.lock().unwrap();
        if requests.contains_key(&request.id) {
            warn!(request_id = %request.id, "Request already exists in memory");
            return Err(AppError::DatabaseError("Request already exists".to_string()));
        }
        requests.insert(request.id, request.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_request(&self, request_id: Uuid) -> Result<Option<RequestModel>, AppError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests.get(&request_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_for_receiver(&self, receiver_id: Uuid) -> Result<Vec<RequestModel>, AppError> {
        let requests = self.requests.lock().unwrap();
        let mut owned: Vec<RequestModel> = requests
            .values()
            .filter(|r| r.receiver_id == receiver_id)
            .cloned()
            .collect();
        owned.sort_by_key(|r| r.requested_at);

        debug!(count = owned.len(), "Listed receiver requests in memory");
        Ok(owned)
    }

    #[instrument(skip(self))]
    async fn transition_status(
        &self,
        request_id: Uuid,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> Result<TransitionResult, AppError> {
        let mut requests = self.requests.lock().unwrap();

        let request = match requests.get_mut(&request_id) {
            Some(request) => request,
            None => {
                debug!(request_id = %request_id, "Request not found");
                return Ok(TransitionResult::RequestNotFound);
            }
        };

        if request.status != expected {
            debug!(
                request_id = %request_id,
                current = %request.status,
                expected = %expected,
                "Request status changed concurrently"
            );
            return Ok(TransitionResult::StatusMismatch(request.status));
        }

        request.status = next;

        info!(request_id = %request_id, from = %expected, to = %next, "Request status updated (atomic)");
        Ok(TransitionResult::Success(request.clone()))
    }
}

/// PostgreSQL implementation of request repository
pub struct PostgresRequestRepository {
    pool: PgPool,
}

impl PostgresRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn request_from_row(row: &PgRow) -> Result<RequestModel, AppError> {
    let status: String = row.get("status");
    let status = RequestStatus::from_str(&status).map_err(|_| {
        warn!(status = %status, "Unknown request status stored in database");
        AppError::DatabaseError(format!("Unknown request status: {}", status))
    })?;

    Ok(RequestModel {
        id: row.get("id"),
        drug_id: row.get("drug_id"),
        receiver_id: row.get("receiver_id"),
        status,
        requested_at: row.get("requested_at"),
    })
}

#[async_trait]
impl RequestRepository for PostgresRequestRepository {
    #[instrument(skip(self, request))]
    async fn create_request(&self, request: &RequestModel) -> Result<(), AppError> {
        debug!(request_id = %request.id, drug_id = %request.drug_id, "Creating request in database");

        sqlx::query(
            "INSERT INTO requests (id, drug_id, receiver_id, status, requested_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(request.id)
        .bind(request.drug_id)
        .bind(request.receiver_id)
        .bind(request.status.as_ref())
        .bind(request.requested_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create request in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_request(&self, request_id: Uuid) -> Result<Option<RequestModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, drug_id, receiver_id, status, requested_at FROM requests WHERE id = $1",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, request_id = %request_id, "Failed to fetch request from database");
            AppError::DatabaseError(e.to_string())
        })?;

        row.as_ref().map(request_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn list_for_receiver(&self, receiver_id: Uuid) -> Result<Vec<RequestModel>, AppError> {
        let rows = sqlx::query(
            "SELECT id, drug_id, receiver_id, status, requested_at FROM requests \
             WHERE receiver_id = $1 ORDER BY requested_at",
        )
        .bind(receiver_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, receiver_id = %receiver_id, "Failed to list requests");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(request_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn transition_status(
        &self,
        request_id: Uuid,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> Result<TransitionResult, AppError> {
        let row = sqlx::query(
            "UPDATE requests SET status = $3 WHERE id = $1 AND status = $2 \
             RETURNING id, drug_id, receiver_id, status, requested_at",
        )
        .bind(request_id)
        .bind(expected.as_ref())
        .bind(next.as_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, request_id = %request_id, "Failed to update request status");
            AppError::DatabaseError(e.to_string())
        })?;

        if let Some(row) = row {
            info!(request_id = %request_id, from = %expected, to = %next, "Request status updated");
            return Ok(TransitionResult::Success(request_from_row(&row)?));
        }

        // Nothing updated: either the request is gone or its status moved on
        match self.get_request(request_id).await? {
            Some(current) => Ok(TransitionResult::StatusMismatch(current.status)),
            None => Ok(TransitionResult::RequestNotFound),
        }
    }
}
