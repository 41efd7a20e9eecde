//! Campaigns: named groupings of leads and messages

pub mod manager;
pub mod types;

pub use manager::CampaignManager;
pub use types::{Campaign, CampaignStatus, CreateCampaignRequest, UpdateCampaignRequest};
