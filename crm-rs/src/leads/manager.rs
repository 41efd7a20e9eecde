//! Lead manager for create/read and pipeline updates

use crate::error::{CrmError, Result};
use crate::leads::types::{CreateLeadRequest, Lead, LeadSource, LeadStatus};
use crate::storage::{
    ensure_owned, from_db_time, non_empty, now, require_owner, required_text, to_db_time,
};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

const LEAD_COLUMNS: &str = "id, owner, name, email, company, title, industry, linkedin_url, \
     facebook_url, instagram_handle, phone, notes, status, source, campaign_id, \
     created_at, updated_at";

/// Manages leads with database persistence
///
/// Leads are never deleted; they only move between statuses.
pub struct LeadManager {
    db: SqlitePool,
}

impl LeadManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the leads table
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT,
                company TEXT,
                title TEXT,
                industry TEXT,
                linkedin_url TEXT,
                facebook_url TEXT,
                instagram_handle TEXT,
                phone TEXT,
                notes TEXT,
                status TEXT NOT NULL DEFAULT 'new',
                source TEXT NOT NULL DEFAULT 'manual',
                campaign_id TEXT REFERENCES campaigns(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_owner ON leads(owner, created_at)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Create a new lead
    pub async fn create_lead(&self, owner: &str, request: CreateLeadRequest) -> Result<Lead> {
        require_owner(owner)?;
        let name = required_text(request.name, "Lead name")?;
        let campaign_id = non_empty(request.campaign_id);
        if let Some(campaign_id) = &campaign_id {
            ensure_owned(&self.db, "campaigns", campaign_id, owner).await?;
        }

        let created_at = now();
        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            name,
            email: non_empty(request.email),
            company: non_empty(request.company),
            title: non_empty(request.title),
            industry: non_empty(request.industry),
            linkedin_url: non_empty(request.linkedin_url),
            facebook_url: non_empty(request.facebook_url),
            instagram_handle: non_empty(request.instagram_handle),
            phone: non_empty(request.phone),
            notes: non_empty(request.notes),
            status: request.status.unwrap_or_default(),
            source: request.source.unwrap_or_default(),
            campaign_id,
            created_at,
            updated_at: created_at,
        };

        sqlx::query(&format!(
            "INSERT INTO leads ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            LEAD_COLUMNS
        ))
        .bind(&lead.id)
        .bind(&lead.owner)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.company)
        .bind(&lead.title)
        .bind(&lead.industry)
        .bind(&lead.linkedin_url)
        .bind(&lead.facebook_url)
        .bind(&lead.instagram_handle)
        .bind(&lead.phone)
        .bind(&lead.notes)
        .bind(lead.status.to_db_string())
        .bind(lead.source.to_db_string())
        .bind(&lead.campaign_id)
        .bind(to_db_time(&lead.created_at))
        .bind(to_db_time(&lead.updated_at))
        .execute(&self.db)
        .await?;

        info!("Created lead {} for {}", lead.id, owner);
        Ok(lead)
    }

    /// Get a lead by ID, scoped to its owner
    pub async fn get_lead(&self, owner: &str, id: &str) -> Result<Option<Lead>> {
        require_owner(owner)?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM leads WHERE id = ? AND owner = ?",
            LEAD_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| self.row_to_lead(row)).transpose()
    }

    /// List leads newest first, optionally filtered by status
    pub async fn list_leads(&self, owner: &str, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
        require_owner(owner)?;
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {} FROM leads WHERE owner = ? AND status = ? \
                     ORDER BY created_at DESC, rowid DESC",
                    LEAD_COLUMNS
                ))
                .bind(owner)
                .bind(status.to_db_string())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM leads WHERE owner = ? ORDER BY created_at DESC, rowid DESC",
                    LEAD_COLUMNS
                ))
                .bind(owner)
                .fetch_all(&self.db)
                .await?
            }
        };

        debug!("Found {} leads for {}", rows.len(), owner);
        rows.into_iter().map(|row| self.row_to_lead(row)).collect()
    }

    /// Move a lead to a new status
    pub async fn update_status(&self, owner: &str, id: &str, status: LeadStatus) -> Result<Lead> {
        require_owner(owner)?;
        let result = sqlx::query(
            "UPDATE leads SET status = ?, updated_at = ? WHERE id = ? AND owner = ?",
        )
        .bind(status.to_db_string())
        .bind(to_db_time(&now()))
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CrmError::NotFound(format!("Lead not found: {}", id)));
        }

        self.get_lead(owner, id)
            .await?
            .ok_or_else(|| CrmError::NotFound("Lead disappeared after update".to_string()))
    }

    /// Attach a lead to a campaign, or detach it with `None`
    pub async fn assign_campaign(
        &self,
        owner: &str,
        id: &str,
        campaign_id: Option<&str>,
    ) -> Result<Lead> {
        require_owner(owner)?;
        if let Some(campaign_id) = campaign_id {
            ensure_owned(&self.db, "campaigns", campaign_id, owner).await?;
        }

        let result = sqlx::query(
            "UPDATE leads SET campaign_id = ?, updated_at = ? WHERE id = ? AND owner = ?",
        )
        .bind(campaign_id)
        .bind(to_db_time(&now()))
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CrmError::NotFound(format!("Lead not found: {}", id)));
        }

        self.get_lead(owner, id)
            .await?
            .ok_or_else(|| CrmError::NotFound("Lead disappeared after update".to_string()))
    }

    /// Convert database row to Lead
    fn row_to_lead(&self, row: sqlx::sqlite::SqliteRow) -> Result<Lead> {
        use sqlx::Row;

        let status_str: String = row.try_get("status")?;
        let status = LeadStatus::from_db_string(&status_str)
            .ok_or_else(|| CrmError::Parse(format!("Invalid lead status: {}", status_str)))?;

        let source_str: String = row.try_get("source")?;
        let source = LeadSource::from_db_string(&source_str)
            .ok_or_else(|| CrmError::Parse(format!("Invalid lead source: {}", source_str)))?;

        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Lead {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            company: row.try_get("company")?,
            title: row.try_get("title")?,
            industry: row.try_get("industry")?,
            linkedin_url: row.try_get("linkedin_url")?,
            facebook_url: row.try_get("facebook_url")?,
            instagram_handle: row.try_get("instagram_handle")?,
            phone: row.try_get("phone")?,
            notes: row.try_get("notes")?,
            status,
            source,
            campaign_id: row.try_get("campaign_id")?,
            created_at: from_db_time(&created_at, "created_at")?,
            updated_at: from_db_time(&updated_at, "updated_at")?,
        })
    }
}
