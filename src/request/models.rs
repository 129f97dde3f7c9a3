use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Lifecycle of a donation request.
///
/// pending -> approved | rejected, approved -> sent. Rejected and sent are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Sent,
}

impl RequestStatus {
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
                | (RequestStatus::Approved, RequestStatus::Sent)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Sent)
    }
}

/// Database model for requests table
#[derive(Debug, Clone)]
pub struct RequestModel {
    pub id: Uuid,
    pub drug_id: Uuid,     // Not checked against the drugs table on create
    pub receiver_id: Uuid,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
}

impl RequestModel {
    /// Creates a new pending request
    pub fn new(drug_id: Uuid, receiver_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            drug_id,
            receiver_id,
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
        }
    }
}
