use async_trait::async_trait;

use crate::libs::error::AnyResult;

/// Markdown snapshot of a local document, as handed over by the host editor.
#[derive(Debug, Clone)]
pub struct MarkdownExport {
    pub content: String,
    pub title: String,
}

/// Narrow contract with the host editor. The core never reaches into the
/// host's UI tree; it only consumes already-resolved ids and content.
#[async_trait]
pub trait HostEditor: Send + Sync {
    async fn active_document_id(&self) -> Option<String>;

    async fn export_markdown(&self, document_id: &str) -> AnyResult<MarkdownExport>;

    async fn document_attr(&self, document_id: &str, key: &str) -> Option<String>;

    /// Returns whether the attribute was actually written.
    async fn set_document_attr(&self, document_id: &str, key: &str, value: &str) -> bool;
}

/// Blocking interactions the host surfaces on the core's behalf. Each call
/// suspends the export flow until the user answers.
#[async_trait]
pub trait HostPrompts: Send + Sync {
    /// Ask the user for a fresh tenant token. `None` means the dialog was
    /// cancelled.
    async fn request_credential(&self) -> Option<String>;

    /// The document was already exported once; ask whether to export again.
    async fn confirm_reexport(&self, title: &str, doc_token: &str) -> bool;
}
