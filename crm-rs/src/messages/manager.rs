//! Message manager: record creation, joined listings and status changes

use crate::error::{CrmError, Result};
use crate::messages::types::{CreateMessageRequest, Message, MessageStatus, MessageView};
use crate::storage::{
    ensure_owned, from_db_time, from_db_time_opt, non_empty, now, require_owner, to_db_time,
};
use chrono::{DateTime, Utc};
use outreach_ai::{Channel, MessageType};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "m.id AS id, m.owner AS owner, m.lead_id AS lead_id, \
     m.campaign_id AS campaign_id, m.channel AS channel, m.message_type AS message_type, \
     m.subject AS subject, m.content AS content, m.status AS status, \
     m.ai_generated AS ai_generated, m.sent_at AS sent_at, m.opened_at AS opened_at, \
     m.replied_at AS replied_at, m.created_at AS created_at, m.updated_at AS updated_at";

const VIEW_JOINS: &str = "l.name AS lead_name, l.company AS lead_company, \
     c.name AS campaign_name \
     FROM messages m \
     LEFT JOIN leads l ON l.id = m.lead_id \
     LEFT JOIN campaigns c ON c.id = m.campaign_id";

/// Manages message records with database persistence
///
/// Content never changes once stored; only the lifecycle status moves.
pub struct MessageManager {
    db: SqlitePool,
}

impl MessageManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the messages table
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                lead_id TEXT REFERENCES leads(id) ON DELETE SET NULL,
                campaign_id TEXT REFERENCES campaigns(id) ON DELETE SET NULL,
                channel TEXT NOT NULL,
                message_type TEXT NOT NULL,
                subject TEXT,
                content TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                ai_generated INTEGER NOT NULL DEFAULT 0,
                sent_at TEXT,
                opened_at TEXT,
                replied_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_owner ON messages(owner, created_at)",
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_lead ON messages(lead_id)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Record a message
    ///
    /// Validation runs before anything touches the table, so a rejected
    /// request leaves no row behind.
    pub async fn create_message(
        &self,
        owner: &str,
        request: CreateMessageRequest,
    ) -> Result<Message> {
        require_owner(owner)?;
        let channel = request
            .channel
            .ok_or_else(|| CrmError::Validation("Channel is required".to_string()))?;
        let message_type = request
            .message_type
            .ok_or_else(|| CrmError::Validation("Message type is required".to_string()))?;
        let content = request
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CrmError::Validation("Message content is required".to_string()))?;

        let lead_id = non_empty(request.lead_id);
        if let Some(lead_id) = &lead_id {
            ensure_owned(&self.db, "leads", lead_id, owner).await?;
        }
        let campaign_id = non_empty(request.campaign_id);
        if let Some(campaign_id) = &campaign_id {
            ensure_owned(&self.db, "campaigns", campaign_id, owner).await?;
        }

        let created_at = now();
        let mut message = Message {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            lead_id,
            campaign_id,
            channel,
            message_type,
            subject: non_empty(request.subject),
            content,
            status: request.status.unwrap_or_default(),
            ai_generated: request.ai_generated,
            sent_at: None,
            opened_at: None,
            replied_at: None,
            created_at,
            updated_at: created_at,
        };
        stamp_status(&mut message, created_at);

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, owner, lead_id, campaign_id, channel, message_type, subject,
                content, status, ai_generated, sent_at, opened_at, replied_at,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.owner)
        .bind(&message.lead_id)
        .bind(&message.campaign_id)
        .bind(message.channel.as_str())
        .bind(message.message_type.as_str())
        .bind(&message.subject)
        .bind(&message.content)
        .bind(message.status.to_db_string())
        .bind(message.ai_generated)
        .bind(message.sent_at.as_ref().map(to_db_time))
        .bind(message.opened_at.as_ref().map(to_db_time))
        .bind(message.replied_at.as_ref().map(to_db_time))
        .bind(to_db_time(&message.created_at))
        .bind(to_db_time(&message.updated_at))
        .execute(&self.db)
        .await?;

        info!(
            "Recorded {} message {} for {}",
            message.channel, message.id, owner
        );
        Ok(message)
    }

    /// Get a message by ID
    pub async fn get_message(&self, owner: &str, id: &str) -> Result<Option<Message>> {
        require_owner(owner)?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM messages m WHERE m.id = ? AND m.owner = ?",
            MESSAGE_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| self.row_to_message(&row)).transpose()
    }

    /// List messages newest first, with lead and campaign names
    pub async fn list_messages(&self, owner: &str) -> Result<Vec<MessageView>> {
        require_owner(owner)?;
        let rows = sqlx::query(&format!(
            "SELECT {}, {} WHERE m.owner = ? ORDER BY m.created_at DESC, m.rowid DESC",
            MESSAGE_COLUMNS, VIEW_JOINS
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        debug!("Found {} messages for {}", rows.len(), owner);
        rows.into_iter().map(|row| self.row_to_view(row)).collect()
    }

    /// List the message history of one lead, newest first
    pub async fn list_messages_for_lead(
        &self,
        owner: &str,
        lead_id: &str,
    ) -> Result<Vec<MessageView>> {
        require_owner(owner)?;
        let rows = sqlx::query(&format!(
            "SELECT {}, {} WHERE m.owner = ? AND m.lead_id = ? \
             ORDER BY m.created_at DESC, m.rowid DESC",
            MESSAGE_COLUMNS, VIEW_JOINS
        ))
        .bind(owner)
        .bind(lead_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| self.row_to_view(row)).collect()
    }

    /// Move a message to a new lifecycle status
    ///
    /// The first transition into sent, opened or replied records its time.
    pub async fn update_status(
        &self,
        owner: &str,
        id: &str,
        status: MessageStatus,
    ) -> Result<Message> {
        let mut message = self
            .get_message(owner, id)
            .await?
            .ok_or_else(|| CrmError::NotFound(format!("Message not found: {}", id)))?;

        let changed_at = now();
        message.status = status;
        message.updated_at = changed_at;
        stamp_status(&mut message, changed_at);

        sqlx::query(
            r#"
            UPDATE messages
            SET status = ?, sent_at = ?, opened_at = ?, replied_at = ?, updated_at = ?
            WHERE id = ? AND owner = ?
            "#,
        )
        .bind(message.status.to_db_string())
        .bind(message.sent_at.as_ref().map(to_db_time))
        .bind(message.opened_at.as_ref().map(to_db_time))
        .bind(message.replied_at.as_ref().map(to_db_time))
        .bind(to_db_time(&message.updated_at))
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        info!("Message {} is now {}", id, status.to_db_string());
        Ok(message)
    }

    fn row_to_view(&self, row: sqlx::sqlite::SqliteRow) -> Result<MessageView> {
        use sqlx::Row;

        Ok(MessageView {
            message: self.row_to_message(&row)?,
            lead_name: row.try_get("lead_name")?,
            lead_company: row.try_get("lead_company")?,
            campaign_name: row.try_get("campaign_name")?,
        })
    }

    /// Convert database row to Message
    fn row_to_message(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Message> {
        use sqlx::Row;

        let channel_str: String = row.try_get("channel")?;
        let channel: Channel = channel_str
            .parse()
            .map_err(|e| CrmError::Parse(format!("Invalid message: {}", e)))?;

        let message_type_str: String = row.try_get("message_type")?;
        let message_type: MessageType = message_type_str
            .parse()
            .map_err(|e| CrmError::Parse(format!("Invalid message: {}", e)))?;

        let status_str: String = row.try_get("status")?;
        let status = MessageStatus::from_db_string(&status_str)
            .ok_or_else(|| CrmError::Parse(format!("Invalid message status: {}", status_str)))?;

        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Message {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            lead_id: row.try_get("lead_id")?,
            campaign_id: row.try_get("campaign_id")?,
            channel,
            message_type,
            subject: row.try_get("subject")?,
            content: row.try_get("content")?,
            status,
            ai_generated: row.try_get("ai_generated")?,
            sent_at: from_db_time_opt(row.try_get("sent_at")?, "sent_at")?,
            opened_at: from_db_time_opt(row.try_get("opened_at")?, "opened_at")?,
            replied_at: from_db_time_opt(row.try_get("replied_at")?, "replied_at")?,
            created_at: from_db_time(&created_at, "created_at")?,
            updated_at: from_db_time(&updated_at, "updated_at")?,
        })
    }
}

/// Record when a message first reached its current status
fn stamp_status(message: &mut Message, at: DateTime<Utc>) {
    let slot = match message.status {
        MessageStatus::Sent => &mut message.sent_at,
        MessageStatus::Opened => &mut message.opened_at,
        MessageStatus::Replied => &mut message.replied_at,
        _ => return,
    };
    slot.get_or_insert(at);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(status: MessageStatus) -> Message {
        let at = Utc::now();
        Message {
            id: "m1".to_string(),
            owner: "owner@example.com".to_string(),
            lead_id: None,
            campaign_id: None,
            channel: Channel::Email,
            message_type: MessageType::FollowUp,
            subject: None,
            content: "Hi".to_string(),
            status,
            ai_generated: false,
            sent_at: None,
            opened_at: None,
            replied_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_stamp_status_sets_matching_slot_once() {
        let first = Utc::now();
        let mut msg = message(MessageStatus::Sent);
        stamp_status(&mut msg, first);
        assert_eq!(msg.sent_at, Some(first));

        let later = first + chrono::Duration::seconds(30);
        stamp_status(&mut msg, later);
        assert_eq!(msg.sent_at, Some(first));
        assert!(msg.opened_at.is_none());
        assert!(msg.replied_at.is_none());
    }

    #[test]
    fn test_stamp_status_ignores_other_statuses() {
        let mut msg = message(MessageStatus::Bounced);
        stamp_status(&mut msg, Utc::now());
        assert!(msg.sent_at.is_none() && msg.opened_at.is_none() && msg.replied_at.is_none());
    }
}
