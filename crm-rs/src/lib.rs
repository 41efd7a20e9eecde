//! crm-rs: outreach CRM core
//!
//! Leads, campaigns, message templates and message records for
//! multi-channel outreach, with drafts produced either by substituting a
//! lead into a stored template or by asking a language model.
//!
//! # Example
//!
//! ```no_run
//! use crm_rs::drafts::DraftService;
//! use crm_rs::storage;
//! use outreach_ai::llm::MockLlm;
//! use outreach_ai::MessageGenerator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> crm_rs::Result<()> {
//!     let pool = storage::connect("sqlite::memory:").await?;
//!     storage::init_schema(&pool).await?;
//!
//!     let generator = Arc::new(MessageGenerator::new(Arc::new(MockLlm::new())));
//!     let _drafts = DraftService::new(pool, generator);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`templates`]: template store and placeholder substitution
//! - [`drafts`]: template-backed and generator-backed drafting
//! - [`messages`]: message record store
//! - [`leads`], [`campaigns`]: the records messages are written for
//! - [`api`]: JWT-gated REST API

pub mod api;
pub mod campaigns;
pub mod config;
pub mod drafts;
pub mod error;
pub mod generator;
pub mod leads;
pub mod logging;
pub mod messages;
pub mod storage;
pub mod templates;

// Re-export commonly used types
pub use config::Config;
pub use error::{CrmError, Result};
