//! Lead types and data structures

use chrono::{DateTime, Utc};
use outreach_ai::LeadData;
use serde::{Deserialize, Serialize};

/// A prospective contact tracked for outreach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub industry: Option<String>,
    pub linkedin_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_handle: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub campaign_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Attributes used by template substitution and generation
    pub fn lead_data(&self) -> LeadData {
        LeadData {
            name: self.name.clone(),
            company: self.company.clone(),
            title: self.title.clone(),
            industry: self.industry.clone(),
        }
    }
}

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Opened,
    Replied,
    Meeting,
    Qualified,
    Closed,
    Lost,
}

impl LeadStatus {
    /// Convert to database string
    pub fn to_db_string(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Opened => "opened",
            LeadStatus::Replied => "replied",
            LeadStatus::Meeting => "meeting",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Closed => "closed",
            LeadStatus::Lost => "lost",
        }
    }

    /// Parse from database string
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            "opened" => Some(LeadStatus::Opened),
            "replied" => Some(LeadStatus::Replied),
            "meeting" => Some(LeadStatus::Meeting),
            "qualified" => Some(LeadStatus::Qualified),
            "closed" => Some(LeadStatus::Closed),
            "lost" => Some(LeadStatus::Lost),
            _ => None,
        }
    }
}

/// Where a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    #[default]
    Manual,
    Import,
    Api,
    Referral,
    Other,
}

impl LeadSource {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            LeadSource::Manual => "manual",
            LeadSource::Import => "import",
            LeadSource::Api => "api",
            LeadSource::Referral => "referral",
            LeadSource::Other => "other",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(LeadSource::Manual),
            "import" => Some(LeadSource::Import),
            "api" => Some(LeadSource::Api),
            "referral" => Some(LeadSource::Referral),
            "other" => Some(LeadSource::Other),
            _ => None,
        }
    }
}

/// Request to create a new lead
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLeadRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub facebook_url: Option<String>,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub campaign_id: Option<String>,
}

/// Request to move a lead through the pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLeadStatusRequest {
    pub status: LeadStatus,
}
