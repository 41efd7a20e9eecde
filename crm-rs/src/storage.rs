//! SQLite connection and shared row helpers

use crate::campaigns::CampaignManager;
use crate::error::{CrmError, Result};
use crate::leads::LeadManager;
use crate::messages::MessageManager;
use crate::templates::TemplateManager;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Open (and create if needed) the database behind `database_url`
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection
    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    info!("Connected to {}", database_url);
    Ok(pool)
}

/// Create every table, parents first
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    CampaignManager::new(pool.clone()).init_db().await?;
    LeadManager::new(pool.clone()).init_db().await?;
    TemplateManager::new(pool.clone()).init_db().await?;
    MessageManager::new(pool.clone()).init_db().await?;
    info!("Database schema ready");
    Ok(())
}

/// Reject operations without an authenticated owner
pub(crate) fn require_owner(owner: &str) -> Result<()> {
    if owner.trim().is_empty() {
        return Err(CrmError::Unauthorized("Not authenticated".to_string()));
    }
    Ok(())
}

/// Trimmed value of a required text field
pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CrmError::Validation(format!("{} is required", field)))
}

/// Blank form fields are stored as NULL
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fail with a validation error unless `id` names a row of `owner` in `table`
pub(crate) async fn ensure_owned(
    db: &SqlitePool,
    table: &'static str,
    id: &str,
    owner: &str,
) -> Result<()> {
    let query = format!("SELECT 1 FROM {} WHERE id = ? AND owner = ?", table);
    let found = sqlx::query(&query)
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(CrmError::Validation(format!(
            "Unknown {} reference: {}",
            table.trim_end_matches('s'),
            id
        ))),
    }
}

/// Current time at the precision the database keeps
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
pub(crate) fn to_db_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn from_db_time(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CrmError::Parse(format!("Invalid {} date: {}", column, e)))
}

pub(crate) fn from_db_time_opt(value: Option<String>, column: &str) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| from_db_time(&v, column)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some("  Acme ".into()), "Name").unwrap(), "Acme");
        let err = required_text(Some("   ".into()), "Name").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Name is required");
        assert!(matches!(required_text(None, "Name"), Err(CrmError::Validation(_))));
    }

    #[test]
    fn test_require_owner() {
        assert!(require_owner("owner@example.com").is_ok());
        assert!(matches!(require_owner(""), Err(CrmError::Unauthorized(_))));
    }

    #[test]
    fn test_db_time_round_trip_is_fixed_width() {
        let t = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let s = to_db_time(&t);
        assert_eq!(s, "2024-01-15T10:30:00.000000Z");
        assert_eq!(from_db_time(&s, "created_at").unwrap(), t);
    }
}
