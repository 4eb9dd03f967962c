//! Attachment-aware dispatch core for a multi-provider AI chat gateway.
//!
//! The gateway accepts one chat turn (text plus an optional attachment),
//! validates the attachment against the target model's capability entry,
//! normalizes it into a size-bounded content envelope, routes the turn to
//! the backend adapter bound to the model id, and returns a normalized
//! response. Transient attachment storage is released exactly once on every
//! exit path.
//!
//! # Example
//!
//! ```rust,no_run
//! use fusionai_gateway::{Dispatcher, GatewayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::new(GatewayConfig::from_env());
//!     let response = dispatcher.handle("grok", "hello", None, &[]).await?;
//!     println!("{} ({})", response.content, response.provider);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod normalize;
pub mod providers;
pub mod registry;
pub mod types;

pub use config::{AzureConfig, DeepSeekConfig, GatewayConfig};
pub use dispatcher::{Dispatcher, ModelStatus};
pub use error::GatewayError;
pub use lifecycle::AttachmentGuard;
pub use registry::{CapabilityRegistry, ModelCapability};
pub use types::{
    Attachment, AttachmentKind, AttachmentSource, ContentEnvelope, ConversationTurn, MessageRole,
    ResponseEnvelope, Usage,
};
