// Library crate for the medicine donation backend
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod drug;
pub mod request;
pub mod router;
pub mod session;
pub mod shared;
pub mod upload;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use router::create_router;
pub use session::{SessionClaims, TokenConfig};
pub use shared::{AppError, AppState};
