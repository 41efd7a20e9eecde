//! Leads: contacts tracked through the outreach pipeline

pub mod manager;
pub mod types;

pub use manager::LeadManager;
pub use types::{CreateLeadRequest, Lead, LeadSource, LeadStatus};
