use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::export::models::ExportRecord;

/// In-memory log of successful exports, keyed by the local document id.
/// Lives for the lifetime of the core handle; persistence, if any, is a
/// host concern.
#[derive(Default)]
pub struct ExportRecords {
    records: Mutex<HashMap<String, ExportRecord>>,
}

impl ExportRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-exporting a document overwrites its previous record.
    pub async fn insert(&self, record: ExportRecord) {
        self.records
            .lock()
            .await
            .insert(record.document_id.clone(), record);
    }

    pub async fn get(&self, document_id: &str) -> Option<ExportRecord> {
        self.records.lock().await.get(document_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
