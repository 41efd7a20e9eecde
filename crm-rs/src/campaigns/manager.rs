//! Campaign manager for CRUD operations

use crate::campaigns::types::{
    dedup_channels, Campaign, CampaignStatus, CreateCampaignRequest, UpdateCampaignRequest,
};
use crate::error::{CrmError, Result};
use crate::storage::{from_db_time, non_empty, now, require_owner, required_text, to_db_time};
use outreach_ai::Channel;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

pub struct CampaignManager {
    db: SqlitePool,
}

impl CampaignManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the campaigns table
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS campaigns (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                target_audience TEXT,
                status TEXT NOT NULL DEFAULT 'draft',
                channels TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_campaigns_owner ON campaigns(owner, created_at)",
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn create_campaign(
        &self,
        owner: &str,
        request: CreateCampaignRequest,
    ) -> Result<Campaign> {
        require_owner(owner)?;
        let name = required_text(request.name, "Campaign name")?;
        let created_at = now();

        let campaign = Campaign {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            name,
            description: non_empty(request.description),
            target_audience: non_empty(request.target_audience),
            status: request.status.unwrap_or_default(),
            channels: dedup_channels(request.channels),
            created_at,
            updated_at: created_at,
        };

        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, owner, name, description, target_audience, status, channels,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&campaign.id)
        .bind(&campaign.owner)
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(&campaign.target_audience)
        .bind(campaign.status.to_db_string())
        .bind(serde_json::to_string(&campaign.channels)?)
        .bind(to_db_time(&campaign.created_at))
        .bind(to_db_time(&campaign.updated_at))
        .execute(&self.db)
        .await?;

        info!("Created campaign {} for {}", campaign.id, owner);
        Ok(campaign)
    }

    pub async fn get_campaign(&self, owner: &str, id: &str) -> Result<Option<Campaign>> {
        require_owner(owner)?;
        let row = sqlx::query(
            r#"
            SELECT id, owner, name, description, target_audience, status, channels,
                   created_at, updated_at
            FROM campaigns
            WHERE id = ? AND owner = ?
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| self.row_to_campaign(row)).transpose()
    }

    /// List campaigns, newest first
    pub async fn list_campaigns(&self, owner: &str) -> Result<Vec<Campaign>> {
        require_owner(owner)?;
        let rows = sqlx::query(
            r#"
            SELECT id, owner, name, description, target_audience, status, channels,
                   created_at, updated_at
            FROM campaigns
            WHERE owner = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| self.row_to_campaign(row))
            .collect()
    }

    pub async fn update_campaign(
        &self,
        owner: &str,
        id: &str,
        request: UpdateCampaignRequest,
    ) -> Result<Campaign> {
        let mut campaign = self
            .get_campaign(owner, id)
            .await?
            .ok_or_else(|| CrmError::NotFound(format!("Campaign not found: {}", id)))?;

        if request.name.is_some() {
            campaign.name = required_text(request.name, "Campaign name")?;
        }
        if let Some(description) = request.description {
            campaign.description = non_empty(Some(description));
        }
        if let Some(target_audience) = request.target_audience {
            campaign.target_audience = non_empty(Some(target_audience));
        }
        if let Some(status) = request.status {
            campaign.status = status;
        }
        if let Some(channels) = request.channels {
            campaign.channels = dedup_channels(channels);
        }
        campaign.updated_at = now();

        sqlx::query(
            r#"
            UPDATE campaigns
            SET name = ?, description = ?, target_audience = ?, status = ?, channels = ?,
                updated_at = ?
            WHERE id = ? AND owner = ?
            "#,
        )
        .bind(&campaign.name)
        .bind(&campaign.description)
        .bind(&campaign.target_audience)
        .bind(campaign.status.to_db_string())
        .bind(serde_json::to_string(&campaign.channels)?)
        .bind(to_db_time(&campaign.updated_at))
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        Ok(campaign)
    }

    /// Delete a campaign; its leads and messages are detached, not removed
    pub async fn delete_campaign(&self, owner: &str, id: &str) -> Result<()> {
        require_owner(owner)?;

        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM campaigns WHERE id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CrmError::NotFound(format!("Campaign not found: {}", id)));
        }

        // Also covers databases opened without foreign key enforcement
        sqlx::query("UPDATE leads SET campaign_id = NULL WHERE campaign_id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE messages SET campaign_id = NULL WHERE campaign_id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Deleted campaign {} for {}", id, owner);
        Ok(())
    }

    fn row_to_campaign(&self, row: sqlx::sqlite::SqliteRow) -> Result<Campaign> {
        use sqlx::Row;

        let status_str: String = row.try_get("status")?;
        let status = CampaignStatus::from_db_string(&status_str)
            .ok_or_else(|| CrmError::Parse(format!("Invalid campaign status: {}", status_str)))?;

        let channels_json: String = row.try_get("channels")?;
        let channels: Vec<Channel> = serde_json::from_str(&channels_json)?;

        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Campaign {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            target_audience: row.try_get("target_audience")?,
            status,
            channels,
            created_at: from_db_time(&created_at, "created_at")?,
            updated_at: from_db_time(&updated_at, "updated_at")?,
        })
    }
}
