//! # Reconciler
//!
//! Pushes everything written while offline (or after a failed write-through)
//! to the remote store. Runs once per reconnect and once on start when any
//! collection is dirty.
//!
//! ## Pass Per Collection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   lock(collection) ──► state := Syncing                                │
//! │        │                                                                │
//! │        ├─ 1. tombstones   delete_one(key) each, acknowledge successes  │
//! │        ├─ 2. queue        insert_one(record) FIFO, keep failures       │
//! │        │                  in original order, drop successes             │
//! │        ├─ 3. snapshot     products only, when they were DirtyLocal:    │
//! │        │                  upsert_many(cache)                            │
//! │        │                                                                │
//! │        └─► state := Synced (all ok) | DirtyLocal (anything failed)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no backoff: what fails stays for the next reconnect.

use serde::Serialize;
use tracing::{debug, info, warn};

use nayra_core::{Collection, DailySummary, Product, Sale, SyncState};
use nayra_db::QueuedEntity;

use crate::error::SyncResult;
use crate::manager::SyncContext;
use crate::remote::{RemovableRecord, SyncRecord};

// =============================================================================
// Report
// =============================================================================

/// What one collection's pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub collection: Option<Collection>,
    pub removals_replayed: usize,
    pub removals_failed: usize,
    pub records_replayed: usize,
    pub records_failed: usize,
    /// `Some(ok)` if the product snapshot was pushed.
    pub snapshot_pushed: Option<bool>,
    pub state: SyncState,
}

impl CollectionReport {
    fn new(collection: Collection) -> Self {
        Self {
            collection: Some(collection),
            ..Self::default()
        }
    }

    pub fn all_ok(&self) -> bool {
        self.removals_failed == 0 && self.records_failed == 0 && self.snapshot_pushed != Some(false)
    }
}

/// Result of a full reconcile pass. Collections with nothing to push are
/// left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub collections: Vec<CollectionReport>,
}

impl ReconcileReport {
    pub fn all_ok(&self) -> bool {
        self.collections.iter().all(CollectionReport::all_ok)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn records_replayed(&self) -> usize {
        self.collections.iter().map(|c| c.records_replayed).sum()
    }

    pub fn get(&self, collection: Collection) -> Option<&CollectionReport> {
        self.collections
            .iter()
            .find(|c| c.collection == Some(collection))
    }
}

// =============================================================================
// Reconciler
// =============================================================================

#[derive(Debug, Clone)]
pub struct Reconciler {
    ctx: SyncContext,
}

impl Reconciler {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Runs one pass over every collection.
    pub async fn reconcile(&self) -> SyncResult<ReconcileReport> {
        info!("Reconciling local changes");
        let mut report = ReconcileReport::default();

        if let Some(products) = self.reconcile_products().await? {
            report.collections.push(products);
        }
        if let Some(sales) = self.reconcile_queue::<Sale>().await? {
            report.collections.push(sales);
        }
        if let Some(summaries) = self.reconcile_summaries().await? {
            report.collections.push(summaries);
        }

        info!(
            collections = report.collections.len(),
            replayed = report.records_replayed(),
            all_ok = report.all_ok(),
            "Reconcile finished"
        );
        Ok(report)
    }

    /// Runs a pass only if some collection has unsynced changes.
    pub async fn reconcile_if_dirty(&self) -> SyncResult<Option<ReconcileReport>> {
        if self.ctx.tracker().any_dirty().await? {
            Ok(Some(self.reconcile().await?))
        } else {
            debug!("Nothing to reconcile");
            Ok(None)
        }
    }

    async fn reconcile_products(&self) -> SyncResult<Option<CollectionReport>> {
        let _guard = self.ctx.lock(Collection::Products).await;
        let state = self.ctx.tracker().state(Collection::Products).await?;
        let tombstones = self.ctx.cache().tombstones::<Product>().all().await?;
        if state == SyncState::Synced && tombstones.is_empty() {
            return Ok(None);
        }

        self.ctx.tracker().begin(Collection::Products).await?;
        let mut report = CollectionReport::new(Collection::Products);
        self.replay_removals::<Product>(&tombstones, &mut report).await?;

        if state != SyncState::Synced {
            let products: Vec<Product> = self.ctx.cache().read().await?;
            let pushed = match self.ctx.adapter().upsert_many(&products).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(count = products.len(), error = %e, "Product snapshot push failed");
                    false
                }
            };
            report.snapshot_pushed = Some(pushed);
        }

        report.state = self
            .ctx
            .tracker()
            .finish(Collection::Products, report.all_ok())
            .await?;
        Ok(Some(report))
    }

    async fn reconcile_summaries(&self) -> SyncResult<Option<CollectionReport>> {
        let _guard = self.ctx.lock(Collection::Summaries).await;
        let state = self.ctx.tracker().state(Collection::Summaries).await?;
        let tombstones = self.ctx.cache().tombstones::<DailySummary>().all().await?;
        let queued = self.ctx.cache().pending::<DailySummary>().all().await?;
        if state == SyncState::Synced && tombstones.is_empty() && queued.is_empty() {
            return Ok(None);
        }

        self.ctx.tracker().begin(Collection::Summaries).await?;
        let mut report = CollectionReport::new(Collection::Summaries);
        // Removals first, so a summary re-added after an offline removal survives.
        self.replay_removals::<DailySummary>(&tombstones, &mut report).await?;
        self.drain(&queued, &mut report).await?;

        report.state = self
            .ctx
            .tracker()
            .finish(Collection::Summaries, report.all_ok())
            .await?;
        Ok(Some(report))
    }

    async fn reconcile_queue<T>(&self) -> SyncResult<Option<CollectionReport>>
    where
        T: SyncRecord + QueuedEntity,
    {
        let _guard = self.ctx.lock(T::COLLECTION).await;
        let state = self.ctx.tracker().state(T::COLLECTION).await?;
        let queued = self.ctx.cache().pending::<T>().all().await?;
        if state == SyncState::Synced && queued.is_empty() {
            return Ok(None);
        }

        self.ctx.tracker().begin(T::COLLECTION).await?;
        let mut report = CollectionReport::new(T::COLLECTION);
        self.drain(&queued, &mut report).await?;

        report.state = self
            .ctx
            .tracker()
            .finish(T::COLLECTION, report.all_ok())
            .await?;
        Ok(Some(report))
    }

    /// Replays queued inserts oldest first. Failures stay queued in order.
    async fn drain<T>(&self, queued: &[T], report: &mut CollectionReport) -> SyncResult<()>
    where
        T: SyncRecord + QueuedEntity,
    {
        let mut replayed = Vec::with_capacity(queued.len());
        for record in queued {
            match self.ctx.adapter().insert_one(record).await {
                Ok(_) => replayed.push(record.clone()),
                Err(e) => {
                    warn!(collection = %T::COLLECTION, error = %e, "Replay failed, keeping record queued");
                    report.records_failed += 1;
                }
            }
        }

        report.records_replayed = replayed.len();
        self.ctx.cache().pending::<T>().remove_replayed(&replayed).await?;
        debug!(
            collection = %T::COLLECTION,
            replayed = report.records_replayed,
            failed = report.records_failed,
            "Queue drained"
        );
        Ok(())
    }

    async fn replay_removals<T: RemovableRecord>(
        &self,
        keys: &[String],
        report: &mut CollectionReport,
    ) -> SyncResult<()> {
        let mut done = Vec::with_capacity(keys.len());
        for key in keys {
            match self.ctx.adapter().delete_one::<T>(key).await {
                Ok(()) => done.push(key.clone()),
                Err(e) => {
                    warn!(collection = %T::COLLECTION, key = %key, error = %e, "Removal replay failed");
                    report.removals_failed += 1;
                }
            }
        }

        report.removals_replayed = done.len();
        self.ctx.cache().tombstones::<T>().acknowledge(&done).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::fixtures::{harness, new_product};
    use crate::manager::SyncOutcome;
    use nayra_core::SaleType;
    use serde_json::json;

    #[tokio::test]
    async fn test_offline_sales_drain_once() {
        let h = harness(false);
        let milk = new_product("Milk", 60).into_product();
        let mut ids = Vec::new();
        for qty in 1..=3 {
            ids.push(h.ctx.sales().record(&milk, qty, SaleType::Counter).await.unwrap().value.id);
        }

        h.ctx.connectivity().set_online(true);
        let report = Reconciler::new(h.ctx.clone()).reconcile().await.unwrap();

        let sales = report.get(Collection::Sales).unwrap();
        assert_eq!(sales.records_replayed, 3);
        assert_eq!(sales.state, SyncState::Synced);
        assert!(h.ctx.sales().pending().await.unwrap().is_empty());

        let remote_ids: Vec<String> = h
            .remote
            .rows("sales")
            .await
            .into_iter()
            .filter_map(|r| r["id"].as_str().map(str::to_string))
            .collect();
        assert_eq!(remote_ids, ids);

        // A second pass has nothing left to do.
        let again = Reconciler::new(h.ctx.clone()).reconcile().await.unwrap();
        assert!(again.is_empty());
        assert_eq!(h.remote.rows("sales").await.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_replays_stay_queued_in_order() {
        let h = harness(false);
        let milk = new_product("Milk", 60).into_product();
        let mut sales = Vec::new();
        for qty in 1..=4 {
            sales.push(h.ctx.sales().record(&milk, qty, SaleType::Supply).await.unwrap().value);
        }
        h.remote.reject_rows("id", json!(sales[1].id)).await;
        h.remote.reject_rows("id", json!(sales[3].id)).await;

        h.ctx.connectivity().set_online(true);
        let report = Reconciler::new(h.ctx.clone()).reconcile().await.unwrap();
        assert!(!report.all_ok());
        assert_eq!(
            report.get(Collection::Sales).unwrap().state,
            SyncState::DirtyLocal
        );

        let still_queued = h.ctx.sales().pending().await.unwrap();
        assert_eq!(still_queued, vec![sales[1].clone(), sales[3].clone()]);

        h.remote.accept_all_rows().await;
        let report = Reconciler::new(h.ctx.clone()).reconcile().await.unwrap();
        assert!(report.all_ok());
        assert!(h.ctx.sales().pending().await.unwrap().is_empty());
        assert_eq!(h.remote.rows("sales").await.len(), 4);
    }

    #[tokio::test]
    async fn test_offline_product_changes_pushed_on_reconnect() {
        let h = harness(false);
        let milk = h.ctx.products().add(new_product("Milk", 60)).await.unwrap().value;
        let curd = h.ctx.products().add(new_product("Curd", 30)).await.unwrap().value;
        h.remote
            .seed(
                "products",
                vec![json!({"id": "old", "name": "Stale", "stock": 1, "price": 100, "unit": "kg"})],
            )
            .await;
        h.ctx.products().remove("old").await.unwrap();
        h.ctx.products().remove(&curd.id).await.unwrap();

        h.ctx.connectivity().set_online(true);
        let report = Reconciler::new(h.ctx.clone()).reconcile().await.unwrap();
        let products = report.get(Collection::Products).unwrap();
        assert_eq!(products.removals_replayed, 2);
        assert_eq!(products.snapshot_pushed, Some(true));
        assert_eq!(products.state, SyncState::Synced);

        let read = h.ctx.products().get_all().await.unwrap();
        assert_eq!(read.sync, SyncOutcome::Synced);
        assert_eq!(read.value, vec![milk]);
    }

    #[tokio::test]
    async fn test_summary_readded_after_offline_removal_survives() {
        let h = harness(false);
        let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        h.remote
            .seed(
                "daily_summaries",
                vec![json!({"date": "2024-01-01", "total_sales": 1, "counter_sales": 1, "supply_sales": 0, "products": []})],
            )
            .await;

        h.ctx.summaries().remove(day).await.unwrap();
        h.ctx.summaries().generate(day).await.unwrap();

        h.ctx.connectivity().set_online(true);
        let report = Reconciler::new(h.ctx.clone()).reconcile().await.unwrap();
        assert!(report.all_ok());

        let rows = h.remote.rows("daily_summaries").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["total_sales"], json!(0));
    }

    #[tokio::test]
    async fn test_remote_down_keeps_everything_dirty() {
        let h = harness(false);
        h.ctx.products().add(new_product("Milk", 60)).await.unwrap();
        h.remote.set_failing(true);
        h.ctx.connectivity().set_online(true);

        let report = Reconciler::new(h.ctx.clone()).reconcile_if_dirty().await.unwrap().unwrap();
        assert_eq!(
            report.get(Collection::Products).unwrap().snapshot_pushed,
            Some(false)
        );
        assert!(h.ctx.tracker().any_dirty().await.unwrap());
    }

    #[tokio::test]
    async fn test_clean_state_skips_pass() {
        let h = harness(true);
        let report = Reconciler::new(h.ctx.clone()).reconcile_if_dirty().await.unwrap();
        assert!(report.is_none());
        assert_eq!(h.remote.calls(), 0);
    }
}
