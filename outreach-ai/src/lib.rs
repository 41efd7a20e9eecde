//! outreach-ai - message drafting on top of an LLM provider
//!
//! - [`llm`]: provider abstraction, OpenAI-compatible client and a mock
//! - [`generation`]: prompt shaping and output normalization
//! - [`client`]: remote generator talking to a `/generate-message` endpoint
//! - [`server`]: the HTTP endpoint itself

pub mod client;
pub mod error;
pub mod generation;
pub mod llm;
pub mod server;
pub mod types;

pub use client::RemoteGenerator;
pub use error::GenerationError;
pub use generation::{DraftGenerator, GeneratedMessage, GenerationRequest, MessageGenerator};
pub use types::{Channel, LeadData, MessageType, Tone};
