pub mod auth;
pub mod http;
pub mod models;

pub use auth::CredentialStore;
pub use http::HttpDriveClient;
pub use models::{FolderMeta, ImportJob, JobStatus};

use async_trait::async_trait;

use crate::libs::error::AnyResult;

/// Typed operations against the remote drive service. Implementations do not
/// retry; retry and timeout policy belongs to the orchestrator layer.
#[async_trait]
pub trait DriveClient: Send + Sync {
    /// Resolve the root container. The cheapest authenticated probe, and the
    /// only call wrapped by the token-refresh guard.
    async fn root_folder(&self) -> AnyResult<FolderMeta>;

    /// Folder-typed children of a folder. Infallible by contract: the
    /// selection UI treats "no children" and "error" identically, so
    /// failures are logged and an empty list is returned.
    async fn list_child_folders(&self, folder_token: &str) -> Vec<FolderMeta>;

    /// Upload raw bytes into a folder, returning the transient file token.
    async fn upload_file(&self, bytes: &[u8], name: &str, folder_token: &str)
        -> AnyResult<String>;

    /// Submit a markdown-to-document conversion job, returning its ticket.
    async fn create_import_task(
        &self,
        file_token: &str,
        name: &str,
        folder_token: &str,
    ) -> AnyResult<String>;

    async fn import_task_status(&self, ticket: &str) -> AnyResult<ImportJob>;

    /// Best-effort delete. Failures are logged, never escalated: cleanup
    /// must not change an already-decided outcome.
    async fn delete_file(&self, file_token: &str) -> bool;
}
