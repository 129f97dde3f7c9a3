use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Database model for drugs table
#[derive(Debug, Clone)]
pub struct DrugModel {
    pub id: Uuid,
    pub name: String,
    pub dosage: Option<String>,
    pub expiry_date: DateTime<Utc>,
    pub condition: Option<String>,
    pub image_url: Option<String>,
    pub donor_id: Uuid,
    pub verified: bool, // Gates public listing; no route sets it
    pub created_at: DateTime<Utc>,
}

impl DrugModel {
    /// Creates a new, unverified listing owned by `donor_id`
    pub fn new(
        name: String,
        dosage: Option<String>,
        expiry_date: DateTime<Utc>,
        condition: Option<String>,
        image_url: Option<String>,
        donor_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            dosage,
            expiry_date,
            condition,
            image_url,
            donor_id,
            verified: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date <= now
    }

    /// Visible on the public listing: verified and not yet expired
    pub fn is_available_at(&self, now: DateTime<Utc>) -> bool {
        self.verified && !self.is_expired_at(now)
    }

    /// Case-insensitive substring match on the name
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
