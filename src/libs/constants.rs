// Drive protocol constants

pub const API_BASE: &str = "https://open.feishu.cn/open-apis";

/// Envelope codes that mean the tenant token has expired or was revoked.
/// The provider signals credential problems through these application codes,
/// not through the HTTP status line.
pub const TOKEN_EXPIRED_CODES: [i64; 4] = [99991661, 99991663, 99991664, 99991668];

// Import job wire encoding. KEEP THAT IN SYNC with the provider's
// import_tasks API: 0 = success, 1 = pending, 2 = running, >= 3 = failure.
pub const JOB_STATUS_SUCCEEDED: i64 = 0;
pub const JOB_STATUS_PENDING: i64 = 1;
pub const JOB_STATUS_RUNNING: i64 = 2;

// Polling budget for import-task completion
pub const MAX_POLL_ATTEMPTS: u32 = 60;
pub const POLL_INTERVAL_MS: u64 = 2000;

pub const FOLDER_PAGE_SIZE: u32 = 50;

/// Custom document attribute that remembers the cloud document a local
/// document was last exported to.
pub const EXPORTED_DOC_ATTR: &str = "custom-larkport-doc-token";

/// Display label for a root folder the provider returns without a name.
pub const MY_SPACE_LABEL: &str = "My Space";

/// Advisory codes the import task may attach to a successful conversion.
/// Codes outside this table are surfaced with a generic text; non-numeric
/// entries are provider noise and are dropped before lookup.
pub fn import_warning_message(code: &str) -> String {
    match code {
        "1000" => "some images could not be imported and were skipped".to_string(),
        "1001" => "part of the document content was not converted".to_string(),
        "1002" => "document styles were partially lost during conversion".to_string(),
        "2003" => "the file name was truncated to the provider's length limit".to_string(),
        other => format!("import finished with warning code {}", other),
    }
}
