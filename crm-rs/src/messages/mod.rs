//! Message records: the persisted history of drafted and sent outreach

pub mod manager;
pub mod types;

pub use manager::MessageManager;
pub use types::{
    CreateMessageRequest, Message, MessageStatus, MessageView, UpdateMessageStatusRequest,
};
