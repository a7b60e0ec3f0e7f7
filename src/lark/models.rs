use serde::Deserialize;

use crate::libs::constants::{
    JOB_STATUS_PENDING, JOB_STATUS_RUNNING, JOB_STATUS_SUCCEEDED, TOKEN_EXPIRED_CODES,
};
use crate::libs::error::{AnyResult, LarkportError};

/// Response envelope shared by every drive endpoint. `code == 0` is success;
/// a fixed set of nonzero codes means the credential expired.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> AnyResult<T> {
        if self.code != 0 {
            if TOKEN_EXPIRED_CODES.contains(&self.code) {
                return Err(LarkportError::NotAuthorized);
            }
            return Err(LarkportError::Api {
                code: self.code,
                msg: self.msg.unwrap_or_default(),
            });
        }
        self.data.ok_or(LarkportError::Api {
            code: 0,
            msg: "missing data in successful response".to_string(),
        })
    }
}

/// A drive folder. `name` may be absent for the root container.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderMeta {
    pub token: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded,
    Pending,
    Running,
    Failed,
}

impl JobStatus {
    pub fn from_wire(raw: i64) -> Self {
        match raw {
            JOB_STATUS_SUCCEEDED => JobStatus::Succeeded,
            JOB_STATUS_PENDING => JobStatus::Pending,
            JOB_STATUS_RUNNING => JobStatus::Running,
            _ => JobStatus::Failed,
        }
    }
}

/// Snapshot of an import task, as reported by one status poll.
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub status: JobStatus,
    pub doc_token: Option<String>,
    pub error_msg: Option<String>,
    pub warning_codes: Vec<String>,
}

// Wire DTOs

#[derive(Debug, Deserialize)]
pub struct RootFolderData {
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadData {
    pub file_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportTaskData {
    pub ticket: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportStatusData {
    pub result: ImportResultData,
}

#[derive(Debug, Deserialize)]
pub struct ImportResultData {
    pub job_status: i64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub job_error_msg: Option<String>,
    #[serde(default)]
    pub extra: Vec<String>,
}

impl From<ImportResultData> for ImportJob {
    fn from(result: ImportResultData) -> Self {
        ImportJob {
            status: JobStatus::from_wire(result.job_status),
            doc_token: result.token,
            error_msg: result.job_error_msg,
            warning_codes: result.extra,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FileListData {
    #[serde(default)]
    pub files: Vec<DriveEntryData>,
}

#[derive(Debug, Deserialize)]
pub struct DriveEntryData {
    pub token: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl DriveEntryData {
    pub fn is_folder(&self) -> bool {
        self.entry_type == "folder"
    }
}
