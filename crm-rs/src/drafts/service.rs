//! Draft generation service

use crate::drafts::types::{ConfirmDraftRequest, Draft, DraftRequest, DraftSource};
use crate::error::{CrmError, Result};
use crate::leads::LeadManager;
use crate::messages::{CreateMessageRequest, Message, MessageManager, MessageStatus};
use crate::storage::{non_empty, require_owner};
use crate::templates::{Template, TemplateManager, TemplateRenderer};
use outreach_ai::{DraftGenerator, GenerationRequest, LeadData};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

/// Produces drafts for leads and turns confirmed drafts into messages
pub struct DraftService {
    generator: Arc<dyn DraftGenerator>,
    leads: LeadManager,
    templates: TemplateManager,
    messages: MessageManager,
}

impl DraftService {
    pub fn new(db: SqlitePool, generator: Arc<dyn DraftGenerator>) -> Self {
        info!("Draft generator: {}", generator.describe());
        Self {
            generator,
            leads: LeadManager::new(db.clone()),
            templates: TemplateManager::new(db.clone()),
            messages: MessageManager::new(db),
        }
    }

    /// Template-backed draft; no I/O
    pub fn draft_from_template(template: &Template, lead: &LeadData) -> Draft {
        let rendered = TemplateRenderer::render(template, lead);
        Draft {
            channel: template.channel,
            message_type: template.message_type,
            subject: rendered.subject,
            content: rendered.content,
            ai_generated: false,
            template_id: Some(template.id.clone()),
        }
    }

    /// Generator-backed draft
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Draft> {
        if request.lead_data.name.trim().is_empty() {
            return Err(CrmError::Validation("Lead name is required".to_string()));
        }

        let generated = self.generator.generate(request).await.map_err(|e| {
            warn!("Draft generation failed for {}: {}", request.lead_data.name, e);
            CrmError::from(e)
        })?;

        Ok(Draft {
            channel: request.channel,
            message_type: request.message_type,
            subject: generated.subject,
            content: generated.content,
            ai_generated: true,
            template_id: None,
        })
    }

    /// Produce a draft for `owner` without persisting it
    pub async fn draft(&self, owner: &str, request: DraftRequest) -> Result<Draft> {
        require_owner(owner)?;
        let lead = self
            .resolve_lead(owner, request.lead_id.as_deref(), request.lead)
            .await?;

        match request.source {
            DraftSource::Template { template_id } => {
                let template = self
                    .templates
                    .get_template(owner, &template_id)
                    .await?
                    .ok_or_else(|| {
                        CrmError::NotFound(format!("Template not found: {}", template_id))
                    })?;

                info!("Drafting from template {} for {}", template.name, lead.name);
                Ok(Self::draft_from_template(&template, &lead))
            }
            DraftSource::Generate {
                channel,
                message_type,
                tone,
                custom_prompt,
            } => {
                let channel = channel
                    .ok_or_else(|| CrmError::Validation("Channel is required".to_string()))?;
                let message_type = message_type.ok_or_else(|| {
                    CrmError::Validation("Message type is required".to_string())
                })?;

                let request = GenerationRequest {
                    lead_data: lead,
                    channel,
                    message_type,
                    tone,
                    custom_prompt: non_empty(custom_prompt),
                };
                self.generate(&request).await
            }
        }
    }

    /// Store a draft as a message in draft status
    pub async fn confirm(&self, owner: &str, request: ConfirmDraftRequest) -> Result<Message> {
        let draft = request.draft;
        let message = self
            .messages
            .create_message(
                owner,
                CreateMessageRequest {
                    lead_id: request.lead_id,
                    campaign_id: request.campaign_id,
                    channel: Some(draft.channel),
                    message_type: Some(draft.message_type),
                    subject: draft.subject,
                    content: Some(draft.content),
                    status: Some(MessageStatus::Draft),
                    ai_generated: draft.ai_generated,
                },
            )
            .await?;

        info!("Confirmed draft as message {}", message.id);
        Ok(message)
    }

    async fn resolve_lead(
        &self,
        owner: &str,
        lead_id: Option<&str>,
        inline: Option<LeadData>,
    ) -> Result<LeadData> {
        if let Some(lead_id) = lead_id {
            let lead = self
                .leads
                .get_lead(owner, lead_id)
                .await?
                .ok_or_else(|| CrmError::NotFound(format!("Lead not found: {}", lead_id)))?;
            return Ok(lead.lead_data());
        }

        inline.ok_or_else(|| CrmError::Validation("A lead is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use outreach_ai::{Channel, MessageType, Tone};

    #[test]
    fn test_draft_from_template_inherits_template_vocabulary() {
        let template = Template {
            id: "tpl-1".to_string(),
            owner: "owner@example.com".to_string(),
            name: "LinkedIn Connection Request".to_string(),
            channel: Channel::Linkedin,
            message_type: MessageType::ColdOutreach,
            tone: Tone::Friendly,
            subject_template: None,
            content_template: "Hi {{name}}, how is {{company}}?".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let lead = LeadData::new("Ana").with_company("Globex");

        let draft = DraftService::draft_from_template(&template, &lead);

        assert_eq!(draft.channel, Channel::Linkedin);
        assert_eq!(draft.message_type, MessageType::ColdOutreach);
        assert_eq!(draft.subject, None);
        assert_eq!(draft.content, "Hi Ana, how is Globex?");
        assert!(!draft.ai_generated);
        assert_eq!(draft.template_id.as_deref(), Some("tpl-1"));
    }

    #[test]
    fn test_draft_request_strategies_deserialize() {
        let by_template: DraftRequest = serde_json::from_str(
            r#"{"lead_id":"l1","strategy":"template","template_id":"t1"}"#,
        )
        .unwrap();
        assert!(matches!(
            by_template.source,
            DraftSource::Template { ref template_id } if template_id == "t1"
        ));

        let generated: DraftRequest = serde_json::from_str(
            r#"{"lead":{"name":"Jane"},"strategy":"generate","channel":"sms","message_type":"follow_up"}"#,
        )
        .unwrap();
        match generated.source {
            DraftSource::Generate { channel, message_type, tone, custom_prompt } => {
                assert_eq!(channel, Some(Channel::Sms));
                assert_eq!(message_type, Some(MessageType::FollowUp));
                assert_eq!(tone, Tone::Professional);
                assert!(custom_prompt.is_none());
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }
}
