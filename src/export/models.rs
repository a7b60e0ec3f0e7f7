use serde::{Deserialize, Serialize};

use crate::libs::constants::import_warning_message;

/// A folder picked as an upload or import destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderChoice {
    pub token: String,
    pub name: String,
}

/// What the orchestrator needs to run one export.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub content: String,
    pub title: String,
    pub temp_folder_token: String,
    pub target_folder_token: String,
}

impl ImportRequest {
    pub fn file_name(&self) -> String {
        format!("{}.md", self.title)
    }
}

/// Classified result of one export run.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The document was imported. `doc_token` may be empty when the provider
    /// reported success without a back-reference; `warnings` carries the
    /// human-readable advisory texts of a partial success.
    Succeeded {
        doc_token: String,
        warnings: Vec<String>,
    },
    Failed {
        message: String,
    },
    TimedOut,
}

/// One successful export, remembered for the lifetime of the core handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub document_id: String,
    pub file_token: String,
    pub doc_token: String,
    pub title: String,
    pub exported_at: i64,
}

/// Map the `extra` codes of a successful import to advisory messages.
/// Non-numeric entries are undocumented provider noise and are dropped;
/// order is preserved.
pub fn map_warning_codes(codes: &[String]) -> Vec<String> {
    codes
        .iter()
        .filter(|code| !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()))
        .map(|code| import_warning_message(code))
        .collect()
}
