pub mod config;
pub mod export;
pub mod host;
pub mod lark;
pub mod libs;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use tokio::sync::Mutex;

pub use crate::config::ExportConfig;
pub use crate::export::{
    ExportOutcome, ExportRecord, ExportRecords, FolderChoice, FolderTree, ImportOrchestrator,
    ImportRequest,
};
pub use crate::host::{HostEditor, HostPrompts, MarkdownExport};
pub use crate::lark::{CredentialStore, DriveClient, HttpDriveClient};
pub use crate::libs::error::{AnyResult, LarkportError};

use crate::lark::auth::resolve_root_with_refresh;
use crate::libs::constants::EXPORTED_DOC_ATTR;

/// Handle to the export bridge. Built by the host on load, torn down on
/// unload; there is no global singleton.
pub struct ExportCore {
    config: Mutex<ExportConfig>,
    config_path: Option<PathBuf>,
    credentials: Arc<CredentialStore>,
    client: Arc<dyn DriveClient>,
    orchestrator: ImportOrchestrator,
    records: ExportRecords,
}

impl ExportCore {
    /// Wire the core against the real drive API. `config_path`, when given,
    /// is where configuration is persisted on settings confirmation, after
    /// every successful export and at shutdown.
    pub fn initialize(config: ExportConfig, config_path: Option<PathBuf>) -> Self {
        let credentials = Arc::new(CredentialStore::new(config.tenant_token.clone()));
        let client: Arc<dyn DriveClient> =
            Arc::new(HttpDriveClient::new(credentials.clone()));
        Self::with_client(config, config_path, credentials, client)
    }

    /// Same wiring with an injected client. This is the seam the tests use.
    pub fn with_client(
        config: ExportConfig,
        config_path: Option<PathBuf>,
        credentials: Arc<CredentialStore>,
        client: Arc<dyn DriveClient>,
    ) -> Self {
        Self {
            config: Mutex::new(config),
            config_path,
            credentials,
            orchestrator: ImportOrchestrator::new(client.clone()),
            client,
            records: ExportRecords::new(),
        }
    }

    /// Tear the core down, persisting and returning the final configuration.
    pub async fn shutdown(self) -> ExportConfig {
        let config = self.config.lock().await.clone();
        if let Some(path) = &self.config_path {
            if let Err(e) = config.save(path) {
                error!("Persisting config on shutdown failed: {}", e);
            }
        }
        config
    }

    pub async fn config(&self) -> ExportConfig {
        self.config.lock().await.clone()
    }

    pub fn records(&self) -> &ExportRecords {
        &self.records
    }

    /// Settings-confirmation path: swap the credential in place and remember
    /// the temporary-upload folder.
    pub async fn update_settings(
        &self,
        tenant_token: String,
        temp_folder: Option<FolderChoice>,
    ) -> AnyResult<()> {
        self.credentials.replace(tenant_token.clone()).await;

        let mut config = self.config.lock().await;
        config.tenant_token = tenant_token;
        if let Some(folder) = temp_folder {
            config.temp_folder_token = folder.token;
            config.temp_folder_name = folder.name;
        }
        if let Some(path) = &self.config_path {
            config.save(path)?;
        }
        Ok(())
    }

    /// Build the destination picker model, pre-seeded with the last used
    /// destination. Goes through the refresh guard, so an expired credential
    /// surfaces exactly one re-authentication prompt.
    pub async fn folder_tree(&self, prompts: &dyn HostPrompts) -> AnyResult<FolderTree> {
        let root =
            resolve_root_with_refresh(self.client.as_ref(), &self.credentials, prompts).await?;
        self.sync_refreshed_credential().await;

        let preselected = {
            let config = self.config.lock().await;
            if config.last_target_folder_token.is_empty() {
                None
            } else {
                Some(FolderChoice {
                    token: config.last_target_folder_token.clone(),
                    name: config.last_target_folder_name.clone(),
                })
            }
        };
        Ok(FolderTree::new(root, preselected))
    }

    pub async fn toggle_folder(&self, tree: &mut FolderTree, token: &str) -> bool {
        tree.toggle(self.client.as_ref(), token).await
    }

    /// Export the currently active document into `target`. Returns
    /// `Ok(None)` when the user declined the re-export confirmation; every
    /// completed run comes back as a classified `ExportOutcome`.
    pub async fn export_active_document(
        &self,
        editor: &dyn HostEditor,
        prompts: &dyn HostPrompts,
        target: &FolderChoice,
    ) -> AnyResult<Option<ExportOutcome>> {
        let (temp_folder_token, configured) = {
            let config = self.config.lock().await;
            (
                config.temp_folder_token.clone(),
                config.has_credential() && config.has_temp_folder(),
            )
        };
        if !configured {
            return Err(LarkportError::Config(
                "tenant token and temporary-upload folder must be configured first".to_string(),
            ));
        }

        let document_id = editor
            .active_document_id()
            .await
            .ok_or(LarkportError::NoActiveDocument)?;

        let markdown = editor.export_markdown(&document_id).await?;

        // The document may already live on the remote side; re-exporting
        // creates a second cloud document, so ask first.
        if let Some(existing) = editor.document_attr(&document_id, EXPORTED_DOC_ATTR).await {
            if !existing.is_empty()
                && !prompts.confirm_reexport(&markdown.title, &existing).await
            {
                info!("Re-export of \"{}\" declined", markdown.title);
                return Ok(None);
            }
        }

        let report = self
            .orchestrator
            .run(ImportRequest {
                content: markdown.content,
                title: markdown.title.clone(),
                temp_folder_token,
                target_folder_token: target.token.clone(),
            })
            .await?;

        if let ExportOutcome::Succeeded { doc_token, .. } = &report.outcome {
            self.records
                .insert(ExportRecord {
                    document_id: document_id.clone(),
                    file_token: report.file_token.clone().unwrap_or_default(),
                    doc_token: doc_token.clone(),
                    title: markdown.title.clone(),
                    exported_at: Utc::now().timestamp_millis(),
                })
                .await;

            if !doc_token.is_empty()
                && !editor
                    .set_document_attr(&document_id, EXPORTED_DOC_ATTR, doc_token)
                    .await
            {
                warn!("Could not record the exported doc token on {}", document_id);
            }

            self.remember_target(target).await;
            info!("Exported \"{}\" as cloud document {}", markdown.title, doc_token);
        }

        Ok(Some(report.outcome))
    }

    /// A refresh swaps the credential store in place; mirror it into the
    /// persisted configuration so the next session starts authorized.
    async fn sync_refreshed_credential(&self) {
        let current = self.credentials.bearer().await;
        let mut config = self.config.lock().await;
        if config.tenant_token != current {
            config.tenant_token = current;
            if let Some(path) = &self.config_path {
                if let Err(e) = config.save(path) {
                    error!("Persisting refreshed credential failed: {}", e);
                }
            }
        }
    }

    async fn remember_target(&self, target: &FolderChoice) {
        let mut config = self.config.lock().await;
        config.last_target_folder_token = target.token.clone();
        config.last_target_folder_name = target.name.clone();
        if let Some(path) = &self.config_path {
            if let Err(e) = config.save(path) {
                error!("Persisting last destination failed: {}", e);
            }
        }
    }
}
