use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::time::sleep;

use crate::export::models::{map_warning_codes, ExportOutcome, ImportRequest};
use crate::lark::models::JobStatus;
use crate::lark::DriveClient;
use crate::libs::constants::{MAX_POLL_ATTEMPTS, POLL_INTERVAL_MS};
use crate::libs::error::{AnyResult, LarkportError};

/// Drives one export: upload -> submit -> poll -> cleanup. At most one run
/// is in flight per orchestrator; a second call is rejected immediately
/// instead of queued. Once the upload succeeds, the temporary file is
/// deleted on every path out of the machine.
pub struct ImportOrchestrator {
    client: Arc<dyn DriveClient>,
    in_flight: AtomicBool,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

/// What one run produced: the classified outcome plus the token of the
/// temporary upload (present whenever the upload itself succeeded; the file
/// is already deleted by the time the report is returned).
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: ExportOutcome,
    pub file_token: Option<String>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ImportOrchestrator {
    pub fn new(client: Arc<dyn DriveClient>) -> Self {
        Self::with_polling(
            client,
            Duration::from_millis(POLL_INTERVAL_MS),
            MAX_POLL_ATTEMPTS,
        )
    }

    pub fn with_polling(
        client: Arc<dyn DriveClient>,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
            poll_interval,
            max_poll_attempts,
        }
    }

    /// Run the state machine to a classified outcome. `Err` is returned only
    /// for the pre-flight rejection (`ExportInProgress`); everything that
    /// happens after the first network call is folded into `ExportOutcome`.
    pub async fn run(&self, request: ImportRequest) -> AnyResult<RunReport> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LarkportError::ExportInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let file_name = request.file_name();
        info!("Exporting \"{}\" via temporary upload", request.title);

        let file_token = match self
            .client
            .upload_file(
                request.content.as_bytes(),
                &file_name,
                &request.temp_folder_token,
            )
            .await
        {
            Ok(token) => token,
            Err(e) => {
                error!("Upload of {} failed: {}", file_name, e);
                return Ok(RunReport {
                    outcome: ExportOutcome::Failed {
                        message: format!("upload failed: {}", e),
                    },
                    file_token: None,
                });
            }
        };

        let outcome = match self
            .client
            .create_import_task(&file_token, &request.title, &request.target_folder_token)
            .await
        {
            Ok(ticket) => self.poll_until_terminal(&ticket).await,
            Err(e) => {
                error!("Import task creation failed: {}", e);
                ExportOutcome::Failed {
                    message: format!("import task creation failed: {}", e),
                }
            }
        };

        // Cleanup never changes the already-decided outcome.
        if !self.client.delete_file(&file_token).await {
            warn!("Temporary file {} could not be deleted", file_token);
        }

        Ok(RunReport {
            outcome,
            file_token: Some(file_token),
        })
    }

    async fn poll_until_terminal(&self, ticket: &str) -> ExportOutcome {
        for attempt in 0..self.max_poll_attempts {
            if attempt > 0 {
                sleep(self.poll_interval).await;
            }

            let job = match self.client.import_task_status(ticket).await {
                Ok(job) => job,
                Err(e) => {
                    error!("Import status query for {} failed: {}", ticket, e);
                    return ExportOutcome::Failed {
                        message: format!("import status query failed: {}", e),
                    };
                }
            };

            match job.status {
                JobStatus::Succeeded => {
                    return ExportOutcome::Succeeded {
                        // An empty token still counts as success; only the
                        // back-reference is missing.
                        doc_token: job.doc_token.unwrap_or_default(),
                        warnings: map_warning_codes(&job.warning_codes),
                    };
                }
                JobStatus::Failed => {
                    return ExportOutcome::Failed {
                        message: job
                            .error_msg
                            .unwrap_or_else(|| "import task failed".to_string()),
                    };
                }
                JobStatus::Pending | JobStatus::Running => {}
            }
        }

        warn!("Import task {} still not finished after {} polls", ticket, self.max_poll_attempts);
        ExportOutcome::TimedOut
    }
}
