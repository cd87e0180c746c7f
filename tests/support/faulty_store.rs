use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use news_registry::{
    EditRecord, Fingerprint, InMemoryRecordStore, Record, RecordId, RecordStore, StoreError,
    WriteReceipt,
};

/// Wraps the in-memory ledger and injects failures on demand.
pub struct FaultyStore {
    inner: InMemoryRecordStore,
    failing_meta: Mutex<HashSet<RecordId>>,
    failing_edits: Mutex<HashSet<(RecordId, u64)>>,
    fail_count: AtomicBool,
    reject_writes: AtomicBool,
    unconfirmed_writes: AtomicBool,
    report_ids: AtomicBool,
    grow_during_scan: AtomicBool,
    inflate_counts: AtomicBool,
    meta_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl FaultyStore {
    pub fn new(inner: InMemoryRecordStore) -> Self {
        FaultyStore {
            inner,
            failing_meta: Mutex::new(HashSet::new()),
            failing_edits: Mutex::new(HashSet::new()),
            fail_count: AtomicBool::new(false),
            reject_writes: AtomicBool::new(false),
            unconfirmed_writes: AtomicBool::new(false),
            report_ids: AtomicBool::new(true),
            grow_during_scan: AtomicBool::new(false),
            inflate_counts: AtomicBool::new(false),
            meta_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryRecordStore {
        &self.inner
    }

    pub fn fail_meta_for(&self, id: RecordId) {
        self.failing_meta.lock().unwrap().insert(id);
    }

    pub fn heal_meta_for(&self, id: RecordId) {
        self.failing_meta.lock().unwrap().remove(&id);
    }

    pub fn fail_edit_for(&self, id: RecordId, index: u64) {
        self.failing_edits.lock().unwrap().insert((id, index));
    }

    pub fn fail_total_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn leave_writes_unconfirmed(&self, unconfirmed: bool) {
        self.unconfirmed_writes.store(unconfirmed, Ordering::SeqCst);
    }

    /// Stop reporting assigned ids so the client has to infer them.
    pub fn hide_assigned_ids(&self) {
        self.report_ids.store(false, Ordering::SeqCst);
    }

    /// The next `record_meta` call first appends a record through another
    /// principal, as a concurrent writer would.
    pub fn grow_during_next_scan(&self) {
        self.grow_during_scan.store(true, Ordering::SeqCst);
    }

    /// Report `u64::MAX` for every count, as a misbehaving node might.
    /// Lookups behind those counts still hit the real ledger.
    pub fn inflate_counts(&self) {
        self.inflate_counts.store(true, Ordering::SeqCst);
    }

    fn inflated(&self) -> bool {
        self.inflate_counts.load(Ordering::SeqCst)
    }

    pub fn meta_calls(&self) -> usize {
        self.meta_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::rejected("execution reverted"));
        }
        if self.unconfirmed_writes.load(Ordering::SeqCst) {
            return Err(StoreError::unconfirmed("receipt not received"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FaultyStore {
    async fn create(
        &self,
        fingerprint: Fingerprint,
        source_locator: &str,
    ) -> Result<WriteReceipt, StoreError> {
        self.check_write()?;
        let mut receipt = self.inner.create(fingerprint, source_locator).await?;
        if !self.report_ids.load(Ordering::SeqCst) {
            receipt.record_id = None;
        }
        Ok(receipt)
    }

    async fn amend(
        &self,
        id: RecordId,
        fingerprint: Fingerprint,
        note: &str,
    ) -> Result<WriteReceipt, StoreError> {
        self.check_write()?;
        self.inner.amend(id, fingerprint, note).await
    }

    async fn total_count(&self) -> Result<u64, StoreError> {
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection reset".into()));
        }
        if self.inflated() {
            return Ok(u64::MAX);
        }
        self.inner.total_count().await
    }

    async fn record_meta(&self, id: RecordId) -> Result<Record, StoreError> {
        self.meta_calls.fetch_add(1, Ordering::SeqCst);
        if self.grow_during_scan.swap(false, Ordering::SeqCst) {
            self.inner
                .with_signer(super::bob())
                .create(Fingerprint::of("late arrival"), "http://late")
                .await?;
        }
        let failing = self.failing_meta.lock().unwrap().contains(&id);
        if failing {
            return Err(StoreError::Transport(format!("timeout reading {}", id)));
        }
        if self.inflated() {
            // a real node round-trip; lets a caller's timeout fire mid-scan
            tokio::task::yield_now().await;
            let mut record = self.inner.record_meta(id).await?;
            record.edit_count = u64::MAX;
            return Ok(record);
        }
        self.inner.record_meta(id).await
    }

    async fn edit_count(&self, id: RecordId) -> Result<u64, StoreError> {
        if self.inflated() {
            return Ok(u64::MAX);
        }
        self.inner.edit_count(id).await
    }

    async fn edit(&self, id: RecordId, index: u64) -> Result<EditRecord, StoreError> {
        let failing = self.failing_edits.lock().unwrap().contains(&(id, index));
        if failing {
            return Err(StoreError::Transport(format!(
                "timeout reading edit {} of {}",
                index, id
            )));
        }
        self.inner.edit(id, index).await
    }
}
