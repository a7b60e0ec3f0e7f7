use log::{info, warn};
use tokio::sync::Mutex;

use crate::host::HostPrompts;
use crate::lark::models::FolderMeta;
use crate::lark::DriveClient;
use crate::libs::error::{AnyResult, LarkportError};

/// The single tenant credential, shared by every client call. Expiry is only
/// ever detected reactively, by a failed call; the refresh guard swaps the
/// value in place and the new token is visible to all subsequent calls.
pub struct CredentialStore {
    token: Mutex<String>,
}

impl CredentialStore {
    pub fn new(token: String) -> Self {
        Self {
            token: Mutex::new(token),
        }
    }

    pub async fn bearer(&self) -> String {
        self.token.lock().await.clone()
    }

    pub async fn replace(&self, token: String) {
        *self.token.lock().await = token;
    }
}

/// Resolve the root folder, interposing a single re-authentication round on
/// an expired credential. On a declined prompt or a second failure the
/// operation fails with `NotAuthorized`; the guard never loops.
pub async fn resolve_root_with_refresh(
    client: &dyn DriveClient,
    store: &CredentialStore,
    prompts: &dyn HostPrompts,
) -> AnyResult<FolderMeta> {
    match client.root_folder().await {
        Err(LarkportError::NotAuthorized) => {
            warn!("Tenant token rejected, asking for a fresh credential");
            let Some(fresh) = prompts.request_credential().await else {
                info!("Credential prompt cancelled");
                return Err(LarkportError::NotAuthorized);
            };
            store.replace(fresh).await;
            client.root_folder().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::lark::models::ImportJob;

    struct FlakyClient {
        store: CredentialStore,
        root_calls: AtomicU32,
        fail_first: u32,
    }

    #[async_trait]
    impl DriveClient for FlakyClient {
        async fn root_folder(&self) -> AnyResult<FolderMeta> {
            let call = self.root_calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first || self.store.bearer().await != "fresh-token" {
                return Err(LarkportError::NotAuthorized);
            }
            Ok(FolderMeta {
                token: "root".to_string(),
                name: None,
            })
        }

        async fn list_child_folders(&self, _folder_token: &str) -> Vec<FolderMeta> {
            Vec::new()
        }

        async fn upload_file(
            &self,
            _bytes: &[u8],
            _name: &str,
            _folder_token: &str,
        ) -> AnyResult<String> {
            unreachable!("not exercised")
        }

        async fn create_import_task(
            &self,
            _file_token: &str,
            _name: &str,
            _folder_token: &str,
        ) -> AnyResult<String> {
            unreachable!("not exercised")
        }

        async fn import_task_status(&self, _ticket: &str) -> AnyResult<ImportJob> {
            unreachable!("not exercised")
        }

        async fn delete_file(&self, _file_token: &str) -> bool {
            true
        }
    }

    struct Prompts {
        credential: Option<String>,
    }

    #[async_trait]
    impl HostPrompts for Prompts {
        async fn request_credential(&self) -> Option<String> {
            self.credential.clone()
        }

        async fn confirm_reexport(&self, _title: &str, _doc_token: &str) -> bool {
            true
        }
    }

    fn flaky(initial: &str, fail_first: u32) -> FlakyClient {
        FlakyClient {
            store: CredentialStore::new(initial.to_string()),
            root_calls: AtomicU32::new(0),
            fail_first,
        }
    }

    #[tokio::test]
    async fn refreshes_once_and_retries() {
        let client = flaky("stale-token", 1);
        let prompts = Prompts {
            credential: Some("fresh-token".to_string()),
        };

        let root = resolve_root_with_refresh(&client, &client.store, &prompts)
            .await
            .unwrap();
        assert_eq!(root.token, "root");
        assert_eq!(client.root_calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.store.bearer().await, "fresh-token");
    }

    #[tokio::test]
    async fn cancelled_prompt_fails_without_retry() {
        let client = flaky("stale-token", 1);
        let prompts = Prompts { credential: None };

        let result = resolve_root_with_refresh(&client, &client.store, &prompts).await;
        assert!(matches!(result, Err(LarkportError::NotAuthorized)));
        assert_eq!(client.root_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_retry_does_not_loop() {
        // Fresh credential supplied, but the provider keeps rejecting.
        let client = flaky("stale-token", 5);
        let prompts = Prompts {
            credential: Some("fresh-token".to_string()),
        };

        let result = resolve_root_with_refresh(&client, &client.store, &prompts).await;
        assert!(matches!(result, Err(LarkportError::NotAuthorized)));
        assert_eq!(client.root_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn healthy_credential_needs_no_prompt() {
        let client = flaky("fresh-token", 0);
        let prompts = Prompts { credential: None };

        let root = resolve_root_with_refresh(&client, &client.store, &prompts)
            .await
            .unwrap();
        assert_eq!(root.token, "root");
        assert_eq!(client.root_calls.load(Ordering::SeqCst), 1);
    }
}
