use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::Role;

/// JWT claims identifying the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub role: Role,
    pub iat: usize, // Issued at timestamp (standard JWT claim)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // Only present when token expiry is configured
}
