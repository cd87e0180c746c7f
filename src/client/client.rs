use tracing::{debug, error, info, warn};

use super::cache::RecordCache;
use super::lock::{WriteKey, WriteLocks};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::fingerprint::Fingerprint;
use crate::record::{AuditTrail, EditRecord, Record, RecordId, RecordSummary, Verification};
use crate::store::RecordStore;

/// Presentation order for reconstructed listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    NewestFirst,
    Ascending,
}

/// Client side of the registry: fingerprints content, submits writes, and
/// rebuilds the record list from point queries.
pub struct RegistryClient<S> {
    store: S,
    config: RegistryConfig,
    cache: RecordCache,
    locks: WriteLocks,
}

impl<S: RecordStore> RegistryClient<S> {
    pub fn new(store: S, config: RegistryConfig) -> RegistryResult<Self> {
        config.validate().map_err(RegistryError::Config)?;

        info!(
            chain_id = config.chain_id,
            contract = %config.contract_address,
            rpc_url = %config.rpc_url,
            writable = config.can_write(),
            "registry client ready"
        );

        Ok(RegistryClient {
            store,
            config,
            cache: RecordCache::new(),
            locks: WriteLocks::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register new content. Returns the id the store assigned.
    ///
    /// A failed or unconfirmed submission is reported as `WriteFailed` and is
    /// never retried here. If the write lands but the assigned id cannot be
    /// read back, the error is `CreatedIdUnknown`, which is not retryable.
    pub async fn create(
        &self,
        content: impl AsRef<[u8]>,
        source_locator: &str,
    ) -> RegistryResult<RecordId> {
        let content = content.as_ref();
        if is_blank(content) {
            return Err(RegistryError::validation("content", "must not be blank"));
        }
        if source_locator.trim().is_empty() {
            return Err(RegistryError::validation(
                "source_locator",
                "must not be empty",
            ));
        }
        self.ensure_writable()?;

        let fingerprint = Fingerprint::of(content);
        let _guard = self.locks.acquire(WriteKey::Create).await;

        let result = self.store.create(fingerprint, source_locator).await;
        self.cache.invalidate();
        let receipt = result.map_err(|err| {
            error!(%fingerprint, error = %err, "create failed");
            RegistryError::write("create", None, err)
        })?;

        let id = match receipt.record_id {
            Some(id) => id,
            None => self.store.total_count().await.map_err(|err| {
                warn!(%fingerprint, tx = %receipt.tx, error = %err, "created record id unknown");
                RegistryError::CreatedIdUnknown {
                    tx: receipt.tx,
                    source: err,
                }
            })?,
        };

        debug!(id, %fingerprint, tx = %receipt.tx, "record created");
        Ok(id)
    }

    /// Replace the content of `id`, appending one entry to its audit trail.
    ///
    /// A missing or blank note is replaced by the configured default.
    pub async fn amend(
        &self,
        id: RecordId,
        new_content: impl AsRef<[u8]>,
        note: Option<&str>,
    ) -> RegistryResult<()> {
        let new_content = new_content.as_ref();
        if is_blank(new_content) {
            return Err(RegistryError::validation("content", "must not be blank"));
        }
        self.ensure_writable()?;

        let note = match note {
            Some(note) if !note.trim().is_empty() => note,
            _ => self.config.default_note.as_str(),
        };
        let fingerprint = Fingerprint::of(new_content);
        let _guard = self.locks.acquire(WriteKey::Record(id)).await;

        let result = self.store.amend(id, fingerprint, note).await;
        self.cache.invalidate();
        let receipt = result.map_err(|err| {
            error!(id, %fingerprint, error = %err, "amend failed");
            RegistryError::write("amend", Some(id), err)
        })?;

        debug!(id, %fingerprint, tx = %receipt.tx, "record amended");
        Ok(())
    }

    pub async fn get(&self, id: RecordId) -> RegistryResult<Record> {
        self.store
            .record_meta(id)
            .await
            .map_err(|err| RegistryError::read("record meta", Some(id), err))
    }

    /// Rebuild the full listing, newest first.
    pub async fn list_all(&self) -> RegistryResult<Vec<RecordSummary>> {
        self.list_all_in(Order::NewestFirst).await
    }

    /// Rebuild the full listing by querying ids `1..=total_count` one at a
    /// time.
    ///
    /// Only a failure to read the total count is an error. Individual ids
    /// that fail to load are logged and left out.
    pub async fn list_all_in(&self, order: Order) -> RegistryResult<Vec<RecordSummary>> {
        let generation = self.cache.generation();
        let total = self
            .store
            .total_count()
            .await
            .map_err(|err| RegistryError::read("total count", None, err))?;

        let mut items = Vec::with_capacity(prealloc(total));
        for id in 1..=total {
            match self.store.record_meta(id).await {
                Ok(record) => items.push(RecordSummary::from(record)),
                Err(err) => warn!(id, error = %err, "skipping record during reconstruction"),
            }
        }

        debug!(total, loaded = items.len(), "reconstructed record list");
        self.cache.store(generation, &items);

        Ok(arrange(items, order))
    }

    /// Full audit trail of `id` in chronological order.
    ///
    /// Any failed lookup fails the whole call; a truncated trail is never
    /// returned.
    pub async fn list_edits(&self, id: RecordId) -> RegistryResult<Vec<EditRecord>> {
        let count = self
            .store
            .edit_count(id)
            .await
            .map_err(|err| RegistryError::read("edit count", Some(id), err))?;
        self.fetch_edits(id, count).await
    }

    pub async fn latest_edit(&self, id: RecordId) -> RegistryResult<Option<EditRecord>> {
        let count = self
            .store
            .edit_count(id)
            .await
            .map_err(|err| RegistryError::read("edit count", Some(id), err))?;
        match count.checked_sub(1) {
            Some(index) => self
                .store
                .edit(id, index)
                .await
                .map(Some)
                .map_err(|err| RegistryError::read("edit", Some(id), err)),
            None => Ok(None),
        }
    }

    /// The record and the edits its metadata accounts for.
    pub async fn audit_trail(&self, id: RecordId) -> RegistryResult<AuditTrail> {
        let record = self.get(id).await?;
        // bounded by the meta read so the trail matches the fingerprint we hold
        let edits = self.fetch_edits(id, record.edit_count).await?;
        Ok(AuditTrail::new(record, edits))
    }

    /// Check `content` against the current and historical fingerprints of `id`.
    pub async fn verify(
        &self,
        id: RecordId,
        content: impl AsRef<[u8]>,
    ) -> RegistryResult<Verification> {
        let trail = self.audit_trail(id).await?;
        let verification = trail.verify(content);
        debug!(id, ?verification, "verified content");
        Ok(verification)
    }

    /// Listing from the last reconstruction, unless a write happened since.
    pub fn cached(&self) -> Option<Vec<RecordSummary>> {
        self.cache
            .get()
            .map(|items| arrange(items, Order::NewestFirst))
    }

    /// Cached listing, reconstructing it first if needed.
    pub async fn refresh(&self) -> RegistryResult<Vec<RecordSummary>> {
        match self.cached() {
            Some(items) => Ok(items),
            None => self.list_all().await,
        }
    }

    fn ensure_writable(&self) -> RegistryResult<()> {
        if self.config.can_write() {
            Ok(())
        } else {
            Err(RegistryError::validation(
                "private_key",
                "no signing key configured",
            ))
        }
    }

    async fn fetch_edits(&self, id: RecordId, count: u64) -> RegistryResult<Vec<EditRecord>> {
        let mut edits = Vec::with_capacity(prealloc(count));
        for index in 0..count {
            let edit = self
                .store
                .edit(id, index)
                .await
                .map_err(|err| RegistryError::read("edit", Some(id), err))?;
            edits.push(edit);
        }
        Ok(edits)
    }
}

/// Store-reported counts are untrusted; never reserve more than this up front.
const PREALLOC_LIMIT: u64 = 1024;

fn prealloc(count: u64) -> usize {
    count.min(PREALLOC_LIMIT) as usize
}

/// Empty, or text that is only whitespace. Non-UTF-8 content counts as data.
fn is_blank(content: &[u8]) -> bool {
    match std::str::from_utf8(content) {
        Ok(text) => text.trim().is_empty(),
        Err(_) => content.is_empty(),
    }
}

fn arrange(mut items: Vec<RecordSummary>, order: Order) -> Vec<RecordSummary> {
    if order == Order::NewestFirst {
        items.reverse();
    }
    items
}
