pub mod folder_tree;
pub mod models;
pub mod orchestrator;
pub mod records;

pub use folder_tree::{FolderNode, FolderTree};
pub use models::{ExportOutcome, ExportRecord, FolderChoice, ImportRequest};
pub use orchestrator::{ImportOrchestrator, RunReport};
pub use records::ExportRecords;
