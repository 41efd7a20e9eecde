//! Draft generation: template-backed or generator-backed message drafts
//!
//! Drafting never writes anything. A draft becomes a message record only
//! through [`DraftService::confirm`].

pub mod service;
pub mod types;

pub use service::DraftService;
pub use types::{ConfirmDraftRequest, Draft, DraftRequest, DraftSource};
