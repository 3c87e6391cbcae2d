//! Pending file attachments

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::{Error, Result};

/// Used when the MIME type can't be guessed from the file name
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Where an attachment's bytes come from
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    /// Read lazily when the message is sent
    Path(PathBuf),
    Bytes(Arc<Vec<u8>>),
}

/// A user-selected file queued for the next send
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub source: AttachmentSource,
}

impl Attachment {
    /// Attachment backed by a file on disk. Nothing is read yet.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(&path)
            .first_raw()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        Self {
            name,
            mime_type,
            source: AttachmentSource::Path(path),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            source: AttachmentSource::Bytes(Arc::new(bytes.into())),
        }
    }

    /// Read the raw bytes, suspending until the whole file is in memory
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            AttachmentSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| Error::Encoding(format!("{}: {}", self.name, e))),
            AttachmentSource::Bytes(bytes) => Ok(bytes.as_ref().clone()),
        }
    }

    /// Standard base64 of the file contents
    pub async fn to_base64(&self) -> Result<String> {
        let bytes = self.read_bytes().await?;
        Ok(BASE64_STANDARD.encode(bytes))
    }
}

/// An attachment as the UI lists it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentEntry {
    /// Position in the pending list at render time
    pub index: usize,
    pub name: String,
}

/// Ordered list of attachments waiting for the next send
#[derive(Debug, Default)]
pub struct PendingAttachments {
    items: Vec<Attachment>,
}

impl PendingAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in selection order
    pub fn add(&mut self, files: impl IntoIterator<Item = Attachment>) {
        self.items.extend(files);
    }

    /// Remove by current index; `None` if out of range
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Hand over every attachment, leaving the list empty
    pub fn take(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
    }

    pub fn entries(&self) -> Vec<AttachmentEntry> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, a)| AttachmentEntry {
                index,
                name: a.name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &PendingAttachments) -> Vec<String> {
        list.entries().into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_from_path_guesses_mime() {
        let pdf = Attachment::from_path("/tmp/report.pdf");
        assert_eq!(pdf.name, "report.pdf");
        assert_eq!(pdf.mime_type, "application/pdf");

        let png = Attachment::from_path("photo.png");
        assert_eq!(png.mime_type, "image/png");

        let unknown = Attachment::from_path("blob.zzunknown");
        assert_eq!(unknown.mime_type, DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_remove_uses_current_positions() {
        let mut list = PendingAttachments::new();
        list.add([
            Attachment::from_bytes("a.txt", "text/plain", "a"),
            Attachment::from_bytes("b.txt", "text/plain", "b"),
            Attachment::from_bytes("c.txt", "text/plain", "c"),
        ]);

        list.remove(0);
        // "c.txt" moved to index 1
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.name, "c.txt");
        assert_eq!(names(&list), vec!["b.txt"]);
        assert_eq!(list.entries()[0].index, 0);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = PendingAttachments::new();
        list.add([Attachment::from_bytes("a.txt", "text/plain", "a")]);
        assert!(list.remove(5).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_take_empties_list() {
        let mut list = PendingAttachments::new();
        list.add([Attachment::from_bytes("a.txt", "text/plain", "a")]);
        let taken = list.take();
        assert_eq!(taken.len(), 1);
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_base64_is_stable_and_reversible() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let file = Attachment::from_bytes("all.bin", DEFAULT_MIME_TYPE, bytes.clone());

        let first = file.to_base64().await.unwrap();
        let second = file.to_base64().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(BASE64_STANDARD.decode(first).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_missing_file_rejects() {
        let file = Attachment::from_path("/definitely/not/here.txt");
        let err = file.to_base64().await.unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(err.to_string().contains("here.txt"));
    }
}
