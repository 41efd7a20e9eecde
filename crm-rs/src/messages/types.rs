//! Message record types

use chrono::{DateTime, Utc};
use outreach_ai::{Channel, MessageType};
use serde::{Deserialize, Serialize};

/// Persisted record of a drafted or sent outreach message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub owner: String,
    pub lead_id: Option<String>,
    pub campaign_id: Option<String>,
    pub channel: Channel,
    pub message_type: MessageType,
    pub subject: Option<String>,
    /// Fixed at creation
    pub content: String,
    pub status: MessageStatus,
    pub ai_generated: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub opened_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Delivery lifecycle of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Draft,
    Sent,
    Delivered,
    Opened,
    Replied,
    Bounced,
}

impl MessageStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            MessageStatus::Draft => "draft",
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Opened => "opened",
            MessageStatus::Replied => "replied",
            MessageStatus::Bounced => "bounced",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(MessageStatus::Draft),
            "sent" => Some(MessageStatus::Sent),
            "delivered" => Some(MessageStatus::Delivered),
            "opened" => Some(MessageStatus::Opened),
            "replied" => Some(MessageStatus::Replied),
            "bounced" => Some(MessageStatus::Bounced),
            _ => None,
        }
    }
}

/// Request to record a message
///
/// Channel, message type and content are optional so a missing one is
/// reported as a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    pub channel: Option<Channel>,
    pub message_type: Option<MessageType>,
    #[serde(default)]
    pub subject: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    #[serde(default)]
    pub ai_generated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessageStatusRequest {
    pub status: MessageStatus,
}

/// Message joined with the names of its lead and campaign
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub lead_name: Option<String>,
    pub lead_company: Option<String>,
    pub campaign_name: Option<String>,
}
