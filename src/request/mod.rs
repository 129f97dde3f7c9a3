// Public API - what other modules can use
pub use handlers::{create_request, list_requests, update_request_status};
pub use models::RequestStatus;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
