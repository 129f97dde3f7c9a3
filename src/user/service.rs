use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::UserModel,
    password::{hash_password, verify_password},
    repository::UserRepository,
    types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
};
use crate::{session::TokenConfig, shared::AppError};

/// Registers users and exchanges credentials for session tokens
pub struct CredentialService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
}

impl CredentialService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>, token_config: TokenConfig) -> Self {
        Self {
            repository,
            token_config,
        }
    }

    /// Registers a new user, storing only a salted hash of the password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if request.email.trim().is_empty() {
            return Err(AppError::Validation("email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::Validation("password is required".to_string()));
        }

        if self.repository.find_by_email(&request.email).await?.is_some() {
            warn!("Registration rejected, email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(&request.password)?;
        let user = UserModel::new(
            request.name,
            request.email,
            password_hash,
            request.role.unwrap_or_default(),
        );

        // The repository enforces uniqueness too, for registrations racing past the check above
        self.repository.create_user(&user).await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(RegisterResponse {
            message: "User registered".to_string(),
        })
    }

    /// Verifies credentials and issues a signed token.
    /// Unknown email and wrong password fail identically.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = match self.repository.find_by_email(&request.email).await? {
            Some(user) if verify_password(&request.password, &user.password_hash) => user,
            _ => {
                warn!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.token_config.create_token(user.id, user.role)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse { token })
    }
}
