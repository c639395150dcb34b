pub mod contract_templates;
pub mod contracts;
pub mod dj_producer_relations;
pub mod event_djs;
pub mod events;
pub mod media_files;
pub mod payment_receipts;
pub mod payments;
pub mod producers;
pub mod profiles;

use serde::Deserialize;

/// Optional `limit` on list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(100).clamp(1, 500)
    }
}

/// `file_name` of a raw-body upload; the extension picks the stored object's suffix.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUploadQuery {
    pub file_name: String,
}
