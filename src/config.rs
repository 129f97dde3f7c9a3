use std::path::PathBuf;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const MAX_TOKEN_EXPIRATION_DAYS: i64 = 36_500;

/// Runtime configuration, read once from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string. `None` runs against in-memory repositories.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Tokens carry no `exp` claim unless this is set
    pub token_expiration_days: Option<i64>,
    pub upload_dir: PathBuf,
    /// Upload request body limit. Unlimited unless set.
    pub upload_max_bytes: Option<usize>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_expiration_days = std::env::var("TOKEN_EXPIRATION_DAYS")
            .ok()
            .and_then(|raw| parse_expiration_days(&raw));

        let upload_max_bytes = std::env::var("UPLOAD_MAX_BYTES")
            .ok()
            .and_then(|raw| parse_upload_max_bytes(&raw));

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt_secret,
            token_expiration_days,
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            upload_max_bytes,
            port,
        }
    }
}

/// Accepts 1..=36500 days; anything else leaves tokens without expiry
fn parse_expiration_days(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(days) if (1..=MAX_TOKEN_EXPIRATION_DAYS).contains(&days) => Some(days),
        _ => {
            warn!(
                value = raw,
                "Ignoring TOKEN_EXPIRATION_DAYS, expected 1 to {} days", MAX_TOKEN_EXPIRATION_DAYS
            );
            None
        }
    }
}

fn parse_upload_max_bytes(raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(bytes) if bytes > 0 => Some(bytes),
        _ => {
            warn!(value = raw, "Ignoring UPLOAD_MAX_BYTES, uploads stay unlimited");
            None
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_expiration_days: None,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_max_bytes: None,
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.database_url.is_none());
        assert!(config.token_expiration_days.is_none());
        assert_eq!(config.port, 5000);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(config.upload_max_bytes.is_none());
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case(" 30 ", Some(30))]
    #[case("36500", Some(36_500))]
    #[case("0", None)]
    #[case("-1", None)]
    #[case("36501", None)]
    #[case("1000000000000000", None)]
    #[case("soon", None)]
    fn test_parse_expiration_days(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_expiration_days(raw), expected);
    }

    #[rstest]
    #[case("10485760", Some(10_485_760))]
    #[case("0", None)]
    #[case("-5", None)]
    #[case("ten megs", None)]
    fn test_parse_upload_max_bytes(#[case] raw: &str, #[case] expected: Option<usize>) {
        assert_eq!(parse_upload_max_bytes(raw), expected);
    }
}
