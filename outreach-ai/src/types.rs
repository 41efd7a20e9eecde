//! Shared vocabulary for outreach messages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery channel of a message or template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Linkedin,
    Facebook,
    Instagram,
    Sms,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Email,
        Channel::Linkedin,
        Channel::Facebook,
        Channel::Instagram,
        Channel::Sms,
    ];

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Linkedin => "linkedin",
            Channel::Facebook => "facebook",
            Channel::Instagram => "instagram",
            Channel::Sms => "sms",
        }
    }

    /// Human label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Linkedin => "LinkedIn",
            Channel::Facebook => "Facebook",
            Channel::Instagram => "Instagram",
            Channel::Sms => "SMS",
        }
    }

    /// Only email messages carry a subject line
    pub fn supports_subject(&self) -> bool {
        matches!(self, Channel::Email)
    }
}

/// Purpose of a message within an outreach sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    ColdOutreach,
    FollowUp,
    MeetingRequest,
    ThankYou,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::ColdOutreach => "cold_outreach",
            MessageType::FollowUp => "follow_up",
            MessageType::MeetingRequest => "meeting_request",
            MessageType::ThankYou => "thank_you",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageType::ColdOutreach => "cold outreach",
            MessageType::FollowUp => "follow up",
            MessageType::MeetingRequest => "meeting request",
            MessageType::ThankYou => "thank you",
        }
    }
}

/// Writing tone requested for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Direct,
    Humorous,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Direct => "direct",
            Tone::Humorous => "humorous",
        }
    }
}

/// Error returned when a vocabulary string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_vocabulary {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_vocabulary!(
    Channel,
    "channel",
    [
        Channel::Email,
        Channel::Linkedin,
        Channel::Facebook,
        Channel::Instagram,
        Channel::Sms,
    ]
);
impl_vocabulary!(
    MessageType,
    "message type",
    [
        MessageType::ColdOutreach,
        MessageType::FollowUp,
        MessageType::MeetingRequest,
        MessageType::ThankYou,
    ]
);
impl_vocabulary!(
    Tone,
    "tone",
    [Tone::Professional, Tone::Friendly, Tone::Direct, Tone::Humorous]
);

/// Lead attributes used for personalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadData {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl LeadData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }
}
