//! Template types and data structures

use chrono::{DateTime, Utc};
use outreach_ai::{Channel, MessageType, Tone};
use serde::{Deserialize, Serialize};

/// Reusable, parameterized message skeleton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier
    pub id: String,
    /// Owner identifier
    pub owner: String,
    /// Template name
    pub name: String,
    pub channel: Channel,
    pub message_type: MessageType,
    pub tone: Tone,
    /// Subject line with placeholders; only ever set for email
    pub subject_template: Option<String>,
    /// Body with placeholders
    pub content_template: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new template
///
/// Required fields are optional here so a missing one surfaces as a
/// validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: Option<String>,
    pub channel: Option<Channel>,
    pub message_type: Option<MessageType>,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub subject_template: Option<String>,
    pub content_template: Option<String>,
}

/// Request to update an existing template
///
/// An empty `subject_template` clears the subject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub channel: Option<Channel>,
    pub message_type: Option<MessageType>,
    pub tone: Option<Tone>,
    pub subject_template: Option<String>,
    pub content_template: Option<String>,
}

/// Result of substituting a lead into a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTemplate {
    pub subject: Option<String>,
    pub content: String,
}
