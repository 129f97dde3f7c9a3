use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::DrugModel;
use crate::shared::AppError;

/// Trait for drug listing repository operations
#[async_trait]
pub trait DrugRepository {
    async fn create_drug(&self, drug: &DrugModel) -> Result<(), AppError>;
    async fn get_drug(&self, drug_id: Uuid) -> Result<Option<DrugModel>, AppError>;

    /// Verified drugs expiring after `now`, oldest listing first
    async fn list_available(&self, now: DateTime<Utc>) -> Result<Vec<DrugModel>, AppError>;

    /// Drugs whose name contains `query` case-insensitively, regardless of
    /// verification or expiry
    async fn search_by_name(&self, query: &str) -> Result<Vec<DrugModel>, AppError>;

    /// Out-of-band verification hook; not reachable over HTTP
    async fn set_verified(&self, drug_id: Uuid, verified: bool) -> Result<(), AppError>;
}

/// In-memory implementation of DrugRepository for development and testing
pub struct InMemoryDrugRepository {
    drugs: Mutex<HashMap<Uuid, DrugModel>>,
}

impl Default for InMemoryDrugRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDrugRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            drugs: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated drugs
    pub fn with_drugs(drugs: Vec<DrugModel>) -> Self {
        let drug_map = drugs.into_iter().map(|drug| (drug.id, drug)).collect();

        Self {
            drugs: Mutex::new(drug_map),
        }
    }

    fn collect_sorted<F>(&self, predicate: F) -> Vec<DrugModel>
    where
        F: Fn(&DrugModel) -> bool,
    {
        let drugs = self.drugs.lock().unwrap();
        let mut matches: Vec<DrugModel> = drugs.values().filter(|d| predicate(d)).cloned().collect();
        matches.sort_by_key(|d| d.created_at);
        matches
    }
}

#[async_trait]
impl DrugRepository for InMemoryDrugRepository {
    #[instrument(skip(self, drug))]
    async fn create_drug(&self, drug: &DrugModel) -> Result<(), AppError> {
        debug!(drug_id = %drug.id, donor_id = %drug.donor_id, "Creating drug in memory");

        let mut drugs = self.drugs.lock().unwrap();
        if drugs.contains_key(&drug.id) {
            warn!(drug_id = %drug.id, "Drug already exists in memory");
            return Err(AppError::DatabaseError("Drug already exists".to_string()));
        }
        drugs.insert(drug.id, drug.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_drug(&self, drug_id: Uuid) -> Result<Option<DrugModel>, AppError> {
        let drugs = self.drugs.lock().unwrap();
        Ok(drugs.get(&drug_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_available(&self, now: DateTime<Utc>) -> Result<Vec<DrugModel>, AppError> {
        let available = self.collect_sorted(|d| d.is_available_at(now));
        debug!(count = available.len(), "Listed available drugs in memory");
        Ok(available)
    }

    #[instrument(skip(self))]
    async fn search_by_name(&self, query: &str) -> Result<Vec<DrugModel>, AppError> {
        let matches = self.collect_sorted(|d| d.name_matches(query));
        debug!(count = matches.len(), "Searched drugs in memory");
        Ok(matches)
    }

    #[instrument(skip(self))]
    async fn set_verified(&self, drug_id: Uuid, verified: bool) -> Result<(), AppError> {
        let mut drugs = self.drugs.lock().unwrap();
        match drugs.get_mut(&drug_id) {
            Some(drug) => {
                drug.verified = verified;
                Ok(())
            }
            None => {
                warn!(drug_id = %drug_id, "Drug not found for verification in memory");
                Err(AppError::NotFound("Drug not found".to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of drug repository
pub struct PostgresDrugRepository {
    pool: PgPool,
}

impl PostgresDrugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DRUG_COLUMNS: &str =
    "id, name, dosage, expiry_date, condition, image_url, donor_id, verified, created_at";

fn drug_from_row(row: &PgRow) -> DrugModel {
    DrugModel {
        id: row.get("id"),
        name: row.get("name"),
        dosage: row.get("dosage"),
        expiry_date: row.get("expiry_date"),
        condition: row.get("condition"),
        image_url: row.get("image_url"),
        donor_id: row.get("donor_id"),
        verified: row.get("verified"),
        created_at: row.get("created_at"),
    }
}

/// Escapes LIKE metacharacters so the query matches literally
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[async_trait]
impl DrugRepository for PostgresDrugRepository {
    #[instrument(skip(self, drug))]
    async fn create_drug(&self, drug: &DrugModel) -> Result<(), AppError> {
        debug!(drug_id = %drug.id, donor_id = %drug.donor_id, "Creating drug in database");

        sqlx::query(
            "INSERT INTO drugs (id, name, dosage, expiry_date, condition, image_url, donor_id, verified, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(drug.id)
        .bind(&drug.name)
        .bind(&drug.dosage)
        .bind(drug.expiry_date)
        .bind(&drug.condition)
        .bind(&drug.image_url)
        .bind(drug.donor_id)
        .bind(drug.verified)
        .bind(drug.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create drug in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_drug(&self, drug_id: Uuid) -> Result<Option<DrugModel>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM drugs WHERE id = $1", DRUG_COLUMNS))
            .bind(drug_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, drug_id = %drug_id, "Failed to fetch drug from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(row.as_ref().map(drug_from_row))
    }

    #[instrument(skip(self))]
    async fn list_available(&self, now: DateTime<Utc>) -> Result<Vec<DrugModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM drugs WHERE verified = TRUE AND expiry_date > $1 ORDER BY created_at",
            DRUG_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list available drugs");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(count = rows.len(), "Listed available drugs in database");
        Ok(rows.iter().map(drug_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn search_by_name(&self, query: &str) -> Result<Vec<DrugModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM drugs WHERE name ILIKE '%' || $1 || '%' ESCAPE '\\' ORDER BY created_at",
            DRUG_COLUMNS
        ))
        .bind(escape_like(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to search drugs");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(count = rows.len(), "Searched drugs in database");
        Ok(rows.iter().map(drug_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn set_verified(&self, drug_id: Uuid, verified: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE drugs SET verified = $2 WHERE id = $1")
            .bind(drug_id)
            .bind(verified)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, drug_id = %drug_id, "Failed to update drug verification");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(drug_id = %drug_id, "Drug not found for verification");
            return Err(AppError::NotFound("Drug not found".to_string()));
        }

        Ok(())
    }
}
