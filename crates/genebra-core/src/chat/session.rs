//! Chat session: pending attachments, message log, and the send flow

use std::sync::Arc;

use futures::future::try_join_all;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use super::attachment::{Attachment, AttachmentEntry, PendingAttachments};
use super::completion::{CompletionClient, GenerateContentRequest, InlineData};
use super::logging::{LogConfig, log_completion_interaction};
use super::message::{ChatMessage, MessageId, MessageLog};
use super::render::ERROR_PREFIX;
use crate::error::Result;
use crate::ui::{ChatEvent, ChatView, Key};

/// State of the chat widget for one page load
pub struct ChatSession {
    client: Arc<dyn CompletionClient>,
    view: Arc<dyn ChatView>,
    attachments: Mutex<PendingAttachments>,
    log: Arc<Mutex<MessageLog>>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn CompletionClient>, view: Arc<dyn ChatView>) -> Self {
        Self {
            client,
            view,
            attachments: Mutex::new(PendingAttachments::new()),
            log: Arc::new(Mutex::new(MessageLog::new())),
        }
    }

    /// Route a user action. Returns the in-flight send when the action
    /// started one; the caller drives it with [`PendingSend::complete`].
    pub fn dispatch(&self, event: ChatEvent) -> Option<PendingSend> {
        match event {
            ChatEvent::FilesSelected(files) => {
                self.add_attachments(files);
                None
            }
            ChatEvent::RemoveAttachment(index) => {
                self.remove_attachment(index);
                None
            }
            ChatEvent::SendClicked | ChatEvent::KeyPressed(Key::Enter) => self.begin_send(),
            ChatEvent::KeyPressed(_) => None,
        }
    }

    /// Append files in selection order and redraw the list
    pub fn add_attachments(&self, files: impl IntoIterator<Item = Attachment>) {
        let entries = {
            let mut pending = self.attachments.lock();
            pending.add(files);
            pending.entries()
        };
        debug!("{} attachment(s) pending", entries.len());
        self.view.render_attachments(&entries);
    }

    /// Remove the attachment currently at `index` and redraw the list.
    /// Out-of-range indices are ignored.
    pub fn remove_attachment(&self, index: usize) -> bool {
        let (removed, entries) = {
            let mut pending = self.attachments.lock();
            let removed = pending.remove(index).is_some();
            (removed, pending.entries())
        };
        if !removed {
            debug!("Ignoring removal of attachment {}: only {} pending", index, entries.len());
        }
        self.view.render_attachments(&entries);
        removed
    }

    /// Attachments as currently listed
    pub fn attachments(&self) -> Vec<AttachmentEntry> {
        self.attachments.lock().entries()
    }

    /// Snapshot of the message log
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.log.lock().messages().to_vec()
    }

    /// Synchronous half of a send.
    ///
    /// Takes the input text and pending attachments, clears both, and
    /// appends the user message and the processing placeholder. Returns
    /// `None` when there is nothing to send.
    pub fn begin_send(&self) -> Option<PendingSend> {
        let text = self.view.input_text().trim().to_string();

        let files = {
            let mut pending = self.attachments.lock();
            if text.is_empty() && pending.is_empty() {
                return None;
            }
            pending.take()
        };

        self.view.clear_input();
        self.view.render_attachments(&[]);

        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let user_message = ChatMessage::user(text.clone(), names);
        let placeholder = ChatMessage::placeholder();
        let placeholder_id = placeholder.id.clone();
        {
            let mut log = self.log.lock();
            log.append(user_message.clone());
            log.append(placeholder.clone());
        }
        self.view.append_message(&user_message);
        self.view.append_message(&placeholder);

        info!("Sending message with {} attachment(s)", files.len());
        Some(PendingSend {
            client: self.client.clone(),
            view: self.view.clone(),
            log: self.log.clone(),
            placeholder_id,
            text,
            files,
        })
    }

    /// Full send: [`begin_send`](Self::begin_send) then
    /// [`PendingSend::complete`]. Returns the rendered answer, or `None`
    /// when there was nothing to send.
    pub async fn send(&self) -> Option<String> {
        let pending = self.begin_send()?;
        Some(pending.complete().await)
    }
}

/// A send whose placeholder is on screen and whose answer is pending
pub struct PendingSend {
    client: Arc<dyn CompletionClient>,
    view: Arc<dyn ChatView>,
    log: Arc<Mutex<MessageLog>>,
    placeholder_id: MessageId,
    text: String,
    files: Vec<Attachment>,
}

impl PendingSend {
    /// Id of the placeholder this send will overwrite
    pub fn placeholder_id(&self) -> &MessageId {
        &self.placeholder_id
    }

    /// Encode attachments, call the completion endpoint and overwrite the
    /// placeholder. Never fails: errors become the displayed answer.
    pub async fn complete(self) -> String {
        let result = self.request_answer().await;
        let answer = match &result {
            Ok(answer) => answer.clone(),
            Err(e) => {
                error!("Completion request failed: {}", e);
                format!("{}{}", ERROR_PREFIX, e)
            }
        };

        let attachments: Vec<(String, String)> = self
            .files
            .iter()
            .map(|f| (f.name.clone(), f.mime_type.clone()))
            .collect();
        log_completion_interaction(LogConfig {
            model: self.client.name(),
            text: &self.text,
            attachments: &attachments,
            answer: result.as_ref().ok().map(String::as_str),
            error: result.as_ref().err().map(|_| answer.as_str()),
        });

        let updated = self.log.lock().resolve(&self.placeholder_id, &answer);
        if let Some(message) = updated {
            self.view.update_message(&message);
        }
        answer
    }

    async fn request_answer(&self) -> Result<String> {
        // Every file must be encoded before the payload is built; the first
        // failure aborts the batch
        let inline = try_join_all(self.files.iter().map(encode)).await?;

        let request = GenerateContentRequest::user(self.text.clone(), inline);
        let response = self.client.generate(&request).await?;
        Ok(response.answer())
    }
}

async fn encode(file: &Attachment) -> Result<InlineData> {
    Ok(InlineData {
        mime_type: file.mime_type.clone(),
        data: file.to_base64().await?,
    })
}
