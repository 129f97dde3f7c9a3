use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::SessionClaims;
use crate::{config::AppConfig, shared::AppError, user::Role};

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_days: Option<i64>,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_days: Option<i64>) -> Self {
        Self {
            secret: secret.into(),
            expiration_days,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_expiration_days)
    }

    /// Creates a new JWT token for the given user
    #[instrument(skip(self))]
    pub fn create_token(&self, user_id: Uuid, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = match self.expiration_days {
            Some(days) => Some(
                Duration::try_days(days)
                    .and_then(|ttl| now.checked_add_signed(ttl))
                    .ok_or_else(|| {
                        AppError::JwtError(format!("token expiry of {} days is out of range", days))
                    })?
                    .timestamp() as usize,
            ),
            None => None,
        };

        debug!(
            expiration_days = ?self.expiration_days,
            exp_timestamp = ?exp,
            "Creating JWT token"
        );

        let claims = SessionClaims {
            user_id,
            role,
            iat: now.timestamp() as usize,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid.
    /// Any signature, structure or expiry failure is `Forbidden`.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and validating JWT token");

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &self.validation(),
        )
        .map(|data| {
            debug!(
                user_id = %data.claims.user_id,
                role = %data.claims.role,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Forbidden("Invalid or expired token".to_string())
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.required_spec_claims.clear();
        if self.expiration_days.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }
        validation
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
