//! Draft request and result types

use outreach_ai::{Channel, LeadData, MessageType, Tone};
use serde::{Deserialize, Serialize};

/// Request for a draft, addressed either by stored lead or inline attributes
///
/// ```json
/// {"lead_id": "...", "strategy": "template", "template_id": "..."}
/// {"lead": {"name": "Jane"}, "strategy": "generate", "channel": "sms", "message_type": "follow_up"}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub lead: Option<LeadData>,
    #[serde(flatten)]
    pub source: DraftSource,
}

/// How the draft text is produced
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DraftSource {
    /// Substitute the lead into a stored template
    Template { template_id: String },
    /// Ask the generator for a fresh message
    Generate {
        channel: Option<Channel>,
        message_type: Option<MessageType>,
        #[serde(default)]
        tone: Tone,
        #[serde(default)]
        custom_prompt: Option<String>,
    },
}

/// Unsaved message text, ready to be edited and confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub channel: Channel,
    pub message_type: MessageType,
    pub subject: Option<String>,
    pub content: String,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default)]
    pub template_id: Option<String>,
}

/// Persist a (possibly edited) draft as a message record
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmDraftRequest {
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    pub draft: Draft,
}
