//! Template manager for CRUD operations

use crate::error::{CrmError, Result};
use crate::storage::{from_db_time, non_empty, now, require_owner, required_text, to_db_time};
use crate::templates::types::{CreateTemplateRequest, Template, UpdateTemplateRequest};
use outreach_ai::{Channel, MessageType, Tone};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

/// Manages message templates with database persistence
pub struct TemplateManager {
    db: SqlitePool,
}

/// Subject is meaningful only for email
fn subject_for(channel: Channel, subject: Option<String>) -> Option<String> {
    if channel.supports_subject() {
        non_empty(subject)
    } else {
        None
    }
}

impl TemplateManager {
    /// Create a new template manager
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the templates table
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                channel TEXT NOT NULL,
                message_type TEXT NOT NULL,
                tone TEXT NOT NULL DEFAULT 'professional',
                subject_template TEXT,
                content_template TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_templates_owner ON templates(owner, created_at)",
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_templates_channel ON templates(channel)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Create a new template
    ///
    /// Name, channel, message type and content are required. A subject on a
    /// non-email template is dropped.
    pub async fn create_template(
        &self,
        owner: &str,
        request: CreateTemplateRequest,
    ) -> Result<Template> {
        require_owner(owner)?;
        let name = required_text(request.name, "Template name")?;
        let channel = request
            .channel
            .ok_or_else(|| CrmError::Validation("Channel is required".to_string()))?;
        let message_type = request
            .message_type
            .ok_or_else(|| CrmError::Validation("Message type is required".to_string()))?;
        let content_template = request
            .content_template
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CrmError::Validation("Content template is required".to_string()))?;

        let created_at = now();
        let template = Template {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            name,
            channel,
            message_type,
            tone: request.tone.unwrap_or_default(),
            subject_template: subject_for(channel, request.subject_template),
            content_template,
            created_at,
            updated_at: created_at,
        };

        sqlx::query(
            r#"
            INSERT INTO templates (
                id, owner, name, channel, message_type, tone,
                subject_template, content_template, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template.id)
        .bind(&template.owner)
        .bind(&template.name)
        .bind(template.channel.as_str())
        .bind(template.message_type.as_str())
        .bind(template.tone.as_str())
        .bind(&template.subject_template)
        .bind(&template.content_template)
        .bind(to_db_time(&template.created_at))
        .bind(to_db_time(&template.updated_at))
        .execute(&self.db)
        .await?;

        info!("Created template {} ({}) for {}", template.id, template.name, owner);
        Ok(template)
    }

    /// Get a template by ID
    pub async fn get_template(&self, owner: &str, id: &str) -> Result<Option<Template>> {
        require_owner(owner)?;
        let row = sqlx::query(
            r#"
            SELECT id, owner, name, channel, message_type, tone,
                   subject_template, content_template, created_at, updated_at
            FROM templates
            WHERE id = ? AND owner = ?
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        if let Some(row) = row {
            Ok(Some(self.row_to_template(row)?))
        } else {
            Ok(None)
        }
    }

    /// List all templates for a user, newest first
    pub async fn list_templates(&self, owner: &str) -> Result<Vec<Template>> {
        require_owner(owner)?;
        let rows = sqlx::query(
            r#"
            SELECT id, owner, name, channel, message_type, tone,
                   subject_template, content_template, created_at, updated_at
            FROM templates
            WHERE owner = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;

        debug!("Found {} templates for {}", rows.len(), owner);
        rows.into_iter()
            .map(|row| self.row_to_template(row))
            .collect()
    }

    /// List templates for one channel
    pub async fn list_templates_by_channel(
        &self,
        owner: &str,
        channel: Channel,
    ) -> Result<Vec<Template>> {
        require_owner(owner)?;
        let rows = sqlx::query(
            r#"
            SELECT id, owner, name, channel, message_type, tone,
                   subject_template, content_template, created_at, updated_at
            FROM templates
            WHERE owner = ? AND channel = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(owner)
        .bind(channel.as_str())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| self.row_to_template(row))
            .collect()
    }

    /// Update a template
    pub async fn update_template(
        &self,
        owner: &str,
        id: &str,
        request: UpdateTemplateRequest,
    ) -> Result<Template> {
        let mut template = self
            .get_template(owner, id)
            .await?
            .ok_or_else(|| CrmError::NotFound(format!("Template not found: {}", id)))?;

        if request.name.is_some() {
            template.name = required_text(request.name, "Template name")?;
        }
        if let Some(channel) = request.channel {
            template.channel = channel;
        }
        if let Some(message_type) = request.message_type {
            template.message_type = message_type;
        }
        if let Some(tone) = request.tone {
            template.tone = tone;
        }
        if let Some(content) = request.content_template {
            if content.trim().is_empty() {
                return Err(CrmError::Validation(
                    "Content template is required".to_string(),
                ));
            }
            template.content_template = content;
        }
        let subject = match request.subject_template {
            Some(subject) => Some(subject),
            None => template.subject_template.take(),
        };
        template.subject_template = subject_for(template.channel, subject);
        template.updated_at = now();

        sqlx::query(
            r#"
            UPDATE templates
            SET name = ?, channel = ?, message_type = ?, tone = ?,
                subject_template = ?, content_template = ?, updated_at = ?
            WHERE id = ? AND owner = ?
            "#,
        )
        .bind(&template.name)
        .bind(template.channel.as_str())
        .bind(template.message_type.as_str())
        .bind(template.tone.as_str())
        .bind(&template.subject_template)
        .bind(&template.content_template)
        .bind(to_db_time(&template.updated_at))
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await?;

        Ok(template)
    }

    /// Delete a template
    pub async fn delete_template(&self, owner: &str, id: &str) -> Result<()> {
        require_owner(owner)?;
        let result = sqlx::query("DELETE FROM templates WHERE id = ? AND owner = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CrmError::NotFound(format!("Template not found: {}", id)));
        }

        Ok(())
    }

    /// Create the starter templates for a new user
    pub async fn create_default_templates(&self, owner: &str) -> Result<Vec<Template>> {
        let starters = [
            (
                "Thank You - Post Meeting",
                Channel::Email,
                MessageType::ThankYou,
                Tone::Friendly,
                Some("Thanks for the great conversation, {{name}}!"),
                "Hi {{name}},\n\nThank you for taking the time to talk with me today about {{company}}'s goals.\n\nAs promised, here are the resources we discussed:\n- [Resource 1]\n- [Resource 2]\n\nI'll follow up early next week with the proposal.\n\nHave a great rest of your week!\n\n[Your Name]",
            ),
            (
                "Meeting Request - Warm Lead",
                Channel::Email,
                MessageType::MeetingRequest,
                Tone::Professional,
                Some("Meeting request - {{company}} growth discussion"),
                "Hi {{name}},\n\nThanks for your interest in how we can help {{company}}.\n\nI'd love to set up a short call to:\n- Understand your current challenges\n- Share relevant case studies\n- Discuss potential solutions\n\nWhich of these slots works best for you?\n- [Time slot 1]\n- [Time slot 2]\n\nLooking forward to it!\n\n[Your Name]",
            ),
            (
                "Follow-up Email - No Response",
                Channel::Email,
                MessageType::FollowUp,
                Tone::Direct,
                Some("Re: {{previous_subject}}"),
                "Hi {{name}},\n\nFollowing up on my previous note about helping {{company}} with [specific benefit].\n\nI know you're busy, so I'll keep this brief: would a quick 10-minute call work better?\n\nIf now isn't the right time, just let me know and I'll check back in a few months.\n\nThanks,\n[Your Name]",
            ),
            (
                "LinkedIn Connection Request",
                Channel::Linkedin,
                MessageType::ColdOutreach,
                Tone::Friendly,
                None,
                "Hi {{name}}, I'd love to connect! I saw your work at {{company}} and would enjoy hearing more about your experience in {{industry}}.",
            ),
            (
                "Cold Email - SaaS Founders",
                Channel::Email,
                MessageType::ColdOutreach,
                Tone::Professional,
                Some("Quick question about {{company}}'s growth strategy"),
                "Hi {{name}},\n\nI noticed {{company}} has been growing fast in the {{industry}} space. What's your biggest challenge when it comes to scaling customer acquisition?\n\nI've helped similar teams lift conversion rates by 40%+ through focused optimization.\n\nWould you be open to a 15-minute call this week to see how this might apply to {{company}}?\n\nBest regards,\n[Your Name]",
            ),
        ];

        let mut created = Vec::with_capacity(starters.len());
        for (name, channel, message_type, tone, subject, content) in starters {
            let template = self
                .create_template(
                    owner,
                    CreateTemplateRequest {
                        name: Some(name.to_string()),
                        channel: Some(channel),
                        message_type: Some(message_type),
                        tone: Some(tone),
                        subject_template: subject.map(str::to_string),
                        content_template: Some(content.to_string()),
                    },
                )
                .await?;
            created.push(template);
        }

        info!("Seeded {} starter templates for {}", created.len(), owner);
        Ok(created)
    }

    /// Convert database row to Template
    fn row_to_template(&self, row: sqlx::sqlite::SqliteRow) -> Result<Template> {
        use sqlx::Row;

        let channel_str: String = row.try_get("channel")?;
        let channel: Channel = channel_str
            .parse()
            .map_err(|e| CrmError::Parse(format!("Invalid template: {}", e)))?;

        let message_type_str: String = row.try_get("message_type")?;
        let message_type: MessageType = message_type_str
            .parse()
            .map_err(|e| CrmError::Parse(format!("Invalid template: {}", e)))?;

        let tone_str: String = row.try_get("tone")?;
        let tone: Tone = tone_str
            .parse()
            .map_err(|e| CrmError::Parse(format!("Invalid template: {}", e)))?;

        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Template {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            name: row.try_get("name")?,
            channel,
            message_type,
            tone,
            subject_template: row.try_get("subject_template")?,
            content_template: row.try_get("content_template")?,
            created_at: from_db_time(&created_at, "created_at")?,
            updated_at: from_db_time(&updated_at, "updated_at")?,
        })
    }
}
