use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{error, info};
use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::lark::auth::CredentialStore;
use crate::lark::models::{
    ApiEnvelope, FileListData, FolderMeta, ImportJob, ImportStatusData, ImportTaskData,
    RootFolderData, UploadData,
};
use crate::lark::DriveClient;
use crate::libs::constants::{API_BASE, FOLDER_PAGE_SIZE};
use crate::libs::error::AnyResult;

/// Drive client backed by the provider's HTTP API. One instance is shared by
/// the whole core; the credential is read from the store on every call so a
/// refresh is picked up immediately.
pub struct HttpDriveClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl HttpDriveClient {
    pub fn new(credentials: Arc<CredentialStore>) -> Self {
        Self::with_base_url(credentials, API_BASE)
    }

    pub fn with_base_url(credentials: Arc<CredentialStore>, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn try_list_child_folders(&self, folder_token: &str) -> AnyResult<Vec<FolderMeta>> {
        let url = format!(
            "{}?folder_token={}&page_size={}",
            self.url("/drive/v1/files"),
            folder_token,
            FOLDER_PAGE_SIZE
        );
        let envelope: ApiEnvelope<FileListData> = self
            .http
            .get(&url)
            .bearer_auth(self.credentials.bearer().await)
            .send()
            .await?
            .json()
            .await?;

        Ok(envelope
            .into_data()?
            .files
            .into_iter()
            .filter(|entry| entry.is_folder())
            .map(|entry| FolderMeta {
                token: entry.token,
                name: Some(entry.name),
            })
            .collect())
    }

    async fn try_delete_file(&self, file_token: &str) -> AnyResult<()> {
        let url = format!("{}?type=file", self.url(&format!("/drive/v1/files/{}", file_token)));
        let envelope: ApiEnvelope<serde_json::Value> = self
            .http
            .delete(&url)
            .bearer_auth(self.credentials.bearer().await)
            .send()
            .await?
            .json()
            .await?;

        if envelope.code != 0 {
            envelope.into_data()?;
        }
        Ok(())
    }
}

#[async_trait]
impl DriveClient for HttpDriveClient {
    async fn root_folder(&self) -> AnyResult<FolderMeta> {
        let envelope: ApiEnvelope<RootFolderData> = self
            .http
            .get(self.url("/drive/explorer/v2/root_folder/meta"))
            .bearer_auth(self.credentials.bearer().await)
            .send()
            .await?
            .json()
            .await?;

        let root = envelope.into_data()?;
        Ok(FolderMeta {
            token: root.token,
            name: root.name,
        })
    }

    async fn list_child_folders(&self, folder_token: &str) -> Vec<FolderMeta> {
        match self.try_list_child_folders(folder_token).await {
            Ok(folders) => folders,
            Err(e) => {
                error!("Listing children of folder {} failed: {}", folder_token, e);
                Vec::new()
            }
        }
    }

    async fn upload_file(
        &self,
        bytes: &[u8],
        name: &str,
        folder_token: &str,
    ) -> AnyResult<String> {
        // The provider rejects uploads whose declared size does not match
        // the payload length.
        let form = Form::new()
            .text("file_name", name.to_string())
            .text("parent_type", "explorer")
            .text("parent_node", folder_token.to_string())
            .text("size", bytes.len().to_string())
            .part(
                "file",
                Part::bytes(bytes.to_vec())
                    .file_name(name.to_string())
                    .mime_str("text/markdown")?,
            );

        let envelope: ApiEnvelope<UploadData> = self
            .http
            .post(self.url("/drive/v1/files/upload_all"))
            .bearer_auth(self.credentials.bearer().await)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        let upload = envelope.into_data()?;
        info!("Uploaded {} ({} bytes) as {}", name, bytes.len(), upload.file_token);
        Ok(upload.file_token)
    }

    async fn create_import_task(
        &self,
        file_token: &str,
        name: &str,
        folder_token: &str,
    ) -> AnyResult<String> {
        let body = json!({
            "file_extension": "md",
            "file_token": file_token,
            "type": "docx",
            "file_name": name,
            "point": {
                "mount_type": 1,
                "mount_key": folder_token,
            },
        });

        let envelope: ApiEnvelope<ImportTaskData> = self
            .http
            .post(self.url("/drive/v1/import_tasks"))
            .bearer_auth(self.credentials.bearer().await)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        Ok(envelope.into_data()?.ticket)
    }

    async fn import_task_status(&self, ticket: &str) -> AnyResult<ImportJob> {
        let envelope: ApiEnvelope<ImportStatusData> = self
            .http
            .get(self.url(&format!("/drive/v1/import_tasks/{}", ticket)))
            .bearer_auth(self.credentials.bearer().await)
            .send()
            .await?
            .json()
            .await?;

        Ok(envelope.into_data()?.result.into())
    }

    async fn delete_file(&self, file_token: &str) -> bool {
        match self.try_delete_file(file_token).await {
            Ok(()) => true,
            Err(e) => {
                error!("Deleting temporary file {} failed: {}", file_token, e);
                false
            }
        }
    }
}
