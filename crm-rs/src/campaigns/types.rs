//! Campaign types

use chrono::{DateTime, Utc};
use outreach_ai::Channel;
use serde::{Deserialize, Serialize};

/// A named grouping of leads and messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub status: CampaignStatus,
    /// Ordered, without duplicates
    pub channels: Vec<Channel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(CampaignStatus::Draft),
            "active" => Some(CampaignStatus::Active),
            "paused" => Some(CampaignStatus::Paused),
            "completed" => Some(CampaignStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub status: Option<CampaignStatus>,
    pub channels: Option<Vec<Channel>>,
}

/// Drop repeated channels, keeping first occurrences in order
pub fn dedup_channels(channels: Vec<Channel>) -> Vec<Channel> {
    let mut unique = Vec::with_capacity(channels.len());
    for channel in channels {
        if !unique.contains(&channel) {
            unique.push(channel);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_channels_keeps_order() {
        let channels = vec![
            Channel::Linkedin,
            Channel::Email,
            Channel::Linkedin,
            Channel::Sms,
            Channel::Email,
        ];
        assert_eq!(
            dedup_channels(channels),
            vec![Channel::Linkedin, Channel::Email, Channel::Sms]
        );
    }
}
