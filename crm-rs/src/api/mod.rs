//! REST API for the CRM

pub mod auth;
pub mod campaigns;
pub mod drafts;
pub mod handlers;
pub mod leads;
pub mod messages;
pub mod server;
pub mod templates;

pub use auth::{Claims, JwtConfig};
pub use server::ApiServer;
