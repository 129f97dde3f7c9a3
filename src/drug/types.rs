use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::models::DrugModel;

/// Request payload for listing a new drug.
/// The donor comes from the session, never from the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDrugRequest {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(deserialize_with = "deserialize_expiry_date")]
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Query string for `GET /api/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Response shape for a drug listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrugResponse {
    pub id: Uuid,
    pub name: String,
    pub dosage: Option<String>,
    pub expiry_date: DateTime<Utc>,
    pub condition: Option<String>,
    pub image_url: Option<String>,
    pub donor_id: Uuid,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DrugModel> for DrugResponse {
    fn from(model: DrugModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            dosage: model.dosage,
            expiry_date: model.expiry_date,
            condition: model.condition,
            image_url: model.image_url,
            donor_id: model.donor_id,
            verified: model.verified,
            created_at: model.created_at,
        }
    }
}

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC
pub fn parse_expiry_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_expiry_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_expiry_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid expiryDate '{}', expected RFC 3339 or YYYY-MM-DD",
            raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rstest::rstest;

    #[test]
    fn test_parse_plain_date() {
        let parsed = parse_expiry_date("2030-01-15").unwrap();
        assert_eq!(parsed.year(), 2030);
        assert_eq!(parsed.day(), 15);
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let parsed = parse_expiry_date("2030-01-15T10:00:00+02:00").unwrap();
        assert_eq!(parsed.hour(), 8);
    }

    #[rstest]
    #[case("")]
    #[case("tomorrow")]
    #[case("2030-13-01")]
    #[case("15/01/2030")]
    fn test_parse_rejects_garbage(#[case] raw: &str) {
        assert!(parse_expiry_date(raw).is_none());
    }

    #[test]
    fn test_create_request_deserialization() {
        let request: CreateDrugRequest = serde_json::from_str(
            r#"{"name": "Aspirin", "dosage": "100mg", "expiryDate": "2030-01-01", "imageUrl": "/uploads/a.png"}"#,
        )
        .unwrap();

        assert_eq!(request.name, "Aspirin");
        assert_eq!(request.dosage.as_deref(), Some("100mg"));
        assert_eq!(request.image_url.as_deref(), Some("/uploads/a.png"));
        assert!(request.condition.is_none());
    }

    #[test]
    fn test_create_request_requires_expiry() {
        let result = serde_json::from_str::<CreateDrugRequest>(r#"{"name": "Aspirin"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_drug_response_uses_camel_case() {
        let model = DrugModel::new(
            "Aspirin".to_string(),
            None,
            Utc::now(),
            None,
            None,
            Uuid::new_v4(),
        );
        let json = serde_json::to_value(DrugResponse::from(model)).unwrap();

        assert!(json.get("expiryDate").is_some());
        assert!(json.get("donorId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["verified"], false);
    }
}
