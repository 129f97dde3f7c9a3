use serde::{Deserialize, Serialize};

use super::models::Role;

/// Request payload for registering a new user
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Response for a successful registration. Never echoes the password.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub message: String,
}

/// Request payload for logging in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying the signed session token
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
}
