use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::drug::repository::{DrugRepository, InMemoryDrugRepository, PostgresDrugRepository};
use crate::request::repository::{
    InMemoryRequestRepository, PostgresRequestRepository, RequestRepository,
};
use crate::session::TokenConfig;
use crate::upload::UploadStore;
use crate::user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub drug_repository: Arc<dyn DrugRepository + Send + Sync>,
    pub request_repository: Arc<dyn RequestRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub upload_store: UploadStore,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        drug_repository: Arc<dyn DrugRepository + Send + Sync>,
        request_repository: Arc<dyn RequestRepository + Send + Sync>,
        token_config: TokenConfig,
        upload_store: UploadStore,
    ) -> Self {
        Self {
            user_repository,
            drug_repository,
            request_repository,
            token_config,
            upload_store,
        }
    }

    /// State backed by in-memory repositories; data is lost on restart
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryDrugRepository::new()),
            Arc::new(InMemoryRequestRepository::new()),
            TokenConfig::from_config(config),
            UploadStore::new(config.upload_dir.clone()).with_max_bytes(config.upload_max_bytes),
        )
    }

    /// State backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresDrugRepository::new(pool.clone())),
            Arc::new(PostgresRequestRepository::new(pool)),
            TokenConfig::from_config(config),
            UploadStore::new(config.upload_dir.clone()).with_max_bytes(config.upload_max_bytes),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("No file provided")]
    NoFileProvided,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateEmail => (
                StatusCode::CONFLICT,
                "Email already registered".to_string(),
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NoFileProvided => (StatusCode::BAD_REQUEST, "No file provided".to_string()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, msg),
            // Detail is logged where the failure happened
            AppError::JwtError(_)
            | AppError::PasswordHash(_)
            | AppError::DatabaseError(_)
            | AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
