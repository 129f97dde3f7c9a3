use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Role a user registers with
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Donor,
    Receiver,
}

/// Database model for users table
///
/// Deliberately not `Serialize`: the password hash never leaves the store.
#[derive(Debug, Clone)]
pub struct UserModel {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2id PHC string
    pub role: Role,
}

impl UserModel {
    /// Creates a new user model with a generated ID
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
        }
    }
}
