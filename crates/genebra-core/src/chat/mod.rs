//! Chat widget core
//!
//! A [`ChatSession`] owns the pending attachments and the message log for
//! one page load. Sending is split in two: [`ChatSession::begin_send`]
//! updates the window synchronously, [`PendingSend::complete`] does the
//! network work and overwrites its own placeholder. Several sends may be in
//! flight at once; each one only ever touches the placeholder it created.

mod attachment;
pub mod completion;
pub mod logging;
mod message;
pub mod render;
mod session;

pub use attachment::{Attachment, AttachmentEntry, AttachmentSource, PendingAttachments, DEFAULT_MIME_TYPE};
pub use completion::{CompletionClient, GeminiClient, GenerateContentRequest, GenerateContentResponse};
pub use message::{ChatMessage, MessageId, MessageLog, MessageStatus, Sender};
pub use session::{ChatSession, PendingSend};
