//! Message templates
//!
//! Reusable message skeletons per channel, message type and tone, with
//! lead placeholder substitution.

pub mod manager;
pub mod renderer;
pub mod types;

pub use manager::TemplateManager;
pub use renderer::{TemplateRenderer, PLACEHOLDERS};
pub use types::{CreateTemplateRequest, RenderedTemplate, Template, UpdateTemplateRequest};
