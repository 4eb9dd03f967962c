//! Core value types shared across the dispatch pipeline.

mod attachment;
mod chat;

pub use attachment::{Attachment, AttachmentKind, AttachmentSource, ContentEnvelope};
pub use chat::{ConversationTurn, MessageRole, ResponseEnvelope, Usage};
