use async_trait::async_trait;

use super::client::RegistryClient;
use crate::error::RegistryResult;
use crate::record::{EditRecord, RecordId, RecordSummary};
use crate::store::RecordStore;

/// The registry operations a presentation layer is allowed to call.
///
/// Adapters depend on this trait rather than on a concrete store, so views
/// never talk to the ledger directly.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn create(&self, content: &[u8], source_locator: &str) -> RegistryResult<RecordId>;

    async fn amend(
        &self,
        id: RecordId,
        new_content: &[u8],
        note: Option<&str>,
    ) -> RegistryResult<()>;

    /// Newest first.
    async fn list_all(&self) -> RegistryResult<Vec<RecordSummary>>;

    async fn list_edits(&self, id: RecordId) -> RegistryResult<Vec<EditRecord>>;
}

#[async_trait]
impl<S: RecordStore> Registry for RegistryClient<S> {
    async fn create(&self, content: &[u8], source_locator: &str) -> RegistryResult<RecordId> {
        RegistryClient::create(self, content, source_locator).await
    }

    async fn amend(
        &self,
        id: RecordId,
        new_content: &[u8],
        note: Option<&str>,
    ) -> RegistryResult<()> {
        RegistryClient::amend(self, id, new_content, note).await
    }

    async fn list_all(&self) -> RegistryResult<Vec<RecordSummary>> {
        RegistryClient::list_all(self).await
    }

    async fn list_edits(&self, id: RecordId) -> RegistryResult<Vec<EditRecord>> {
        RegistryClient::list_edits(self, id).await
    }
}
