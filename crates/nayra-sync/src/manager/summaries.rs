//! Daily summaries: point-in-time snapshots keyed by date.

use chrono::NaiveDate;
use tracing::{info, warn};

use nayra_core::summary::summarize;
use nayra_core::{Collection, DailySummary, Product, Sale};
use nayra_db::keys::summary_key;

use super::{Outcome, SyncContext, SyncOutcome};
use crate::error::SyncResult;

#[derive(Debug, Clone)]
pub struct SummaryManager {
    ctx: SyncContext,
}

impl SummaryManager {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn get_all(&self) -> SyncResult<Outcome<Vec<DailySummary>>> {
        self.ctx.get_all().await
    }

    /// Computes the summary of `date` from the cached sales and catalog,
    /// then stores it.
    pub async fn generate(&self, date: NaiveDate) -> SyncResult<Outcome<DailySummary>> {
        let sales: Vec<Sale> = {
            let _guard = self.ctx.lock(Collection::Sales).await;
            self.ctx.cache().read().await?
        };
        let products: Vec<Product> = {
            let _guard = self.ctx.lock(Collection::Products).await;
            self.ctx.cache().read().await?
        };

        let summary = summarize(date, &sales, &products);
        self.add(summary).await
    }

    /// Appends a summary. Several summaries for one date may coexist.
    pub async fn add(&self, summary: DailySummary) -> SyncResult<Outcome<DailySummary>> {
        let _guard = self.ctx.lock(Collection::Summaries).await;

        let (stored, sync) = if self.ctx.is_online() {
            match self.ctx.adapter().insert_one(&summary).await {
                Ok(server) => (server, SyncOutcome::Synced),
                Err(e) => {
                    warn!(date = %summary.date, error = %e, "Remote summary insert failed, queueing");
                    self.enqueue(&summary).await?;
                    (summary, SyncOutcome::failed(&e))
                }
            }
        } else {
            self.enqueue(&summary).await?;
            (summary, SyncOutcome::Queued)
        };

        let mut summaries: Vec<DailySummary> = self.ctx.cache().read().await?;
        summaries.push(stored.clone());
        self.ctx.cache().write(&summaries).await?;

        info!(date = %stored.date, total = %stored.total_sales, sync = %sync, "Summary saved");
        Ok(Outcome::new(stored, sync))
    }

    /// Removes every summary of `date`. The value is how many were cached.
    pub async fn remove(&self, date: NaiveDate) -> SyncResult<Outcome<usize>> {
        let _guard = self.ctx.lock(Collection::Summaries).await;

        let mut summaries: Vec<DailySummary> = self.ctx.cache().read().await?;
        let before = summaries.len();
        summaries.retain(|s| s.date != date);
        let removed = before - summaries.len();
        self.ctx.cache().write(&summaries).await?;

        let unsent = self
            .ctx
            .cache()
            .pending::<DailySummary>()
            .retain(|s| s.date != date)
            .await?;

        let key = summary_key(date);

        let sync = if self.ctx.is_online() {
            match self.ctx.adapter().delete_one::<DailySummary>(&key).await {
                Ok(()) => SyncOutcome::Synced,
                Err(e) => {
                    warn!(%date, error = %e, "Remote summary delete failed");
                    self.defer_removal(&key).await?;
                    SyncOutcome::failed(&e)
                }
            }
        } else {
            self.defer_removal(&key).await?;
            SyncOutcome::Offline
        };

        info!(%date, removed, unsent, sync = %sync, "Summaries removed");
        Ok(Outcome::new(removed, sync))
    }

    async fn enqueue(&self, summary: &DailySummary) -> SyncResult<()> {
        self.ctx.cache().pending::<DailySummary>().enqueue(summary).await?;
        self.ctx.tracker().mark_dirty(Collection::Summaries).await?;
        Ok(())
    }

    async fn defer_removal(&self, key: &str) -> SyncResult<()> {
        self.ctx.cache().tombstones::<DailySummary>().add(key).await?;
        self.ctx.tracker().mark_dirty(Collection::Summaries).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::fixtures::harness;
    use chrono::{TimeZone, Utc};
    use nayra_core::{Money, ProductLine, SaleType};
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn milk() -> Product {
        Product {
            id: "milk".into(),
            name: "Milk".into(),
            stock: 100,
            price: Money::from_rupees(50),
            unit: "packet".into(),
            category: "milk".into(),
        }
    }

    fn sale(id: &str, qty: i64, sale_type: SaleType) -> Sale {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut sale = Sale::record(&milk(), qty, sale_type, at).unwrap();
        sale.id = id.into();
        sale
    }

    #[tokio::test]
    async fn test_generate_from_cached_sales() {
        let h = harness(false);
        h.ctx.cache().write(&[milk()]).await.unwrap();
        h.ctx
            .cache()
            .write(&[sale("s1", 2, SaleType::Counter), sale("s2", 3, SaleType::Supply)])
            .await
            .unwrap();

        let summary = h.ctx.summaries().generate(day()).await.unwrap();
        assert_eq!(summary.sync, SyncOutcome::Queued);
        assert_eq!(summary.value.total_sales, Money::from_rupees(250));
        assert_eq!(summary.value.counter_sales, Money::from_rupees(100));
        assert_eq!(summary.value.supply_sales, Money::from_rupees(150));
        assert_eq!(
            summary.value.products,
            vec![ProductLine {
                name: "Milk".into(),
                quantity: 5,
                amount: Money::from_rupees(250),
            }]
        );
    }

    #[tokio::test]
    async fn test_duplicates_per_date_accumulate() {
        let h = harness(true);
        h.ctx.summaries().generate(day()).await.unwrap();
        h.ctx.summaries().generate(day()).await.unwrap();

        assert_eq!(h.remote.rows("daily_summaries").await.len(), 2);
        let cached: Vec<DailySummary> = h.ctx.cache().read().await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_online_deletes_by_date() {
        let h = harness(true);
        h.ctx.summaries().generate(day()).await.unwrap();

        let removed = h.ctx.summaries().remove(day()).await.unwrap();
        assert_eq!(removed, Outcome::synced(1));
        assert!(h.remote.rows("daily_summaries").await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_offline_purges_queue_and_records_tombstone() {
        let h = harness(false);
        h.ctx.summaries().generate(day()).await.unwrap();

        let removed = h.ctx.summaries().remove(day()).await.unwrap();
        assert_eq!(removed, Outcome::offline(1));
        assert!(h.ctx.cache().pending::<DailySummary>().is_empty().await.unwrap());
        assert_eq!(
            h.ctx.cache().tombstones::<DailySummary>().all().await.unwrap(),
            vec!["2024-01-01"]
        );
        assert_eq!(h.remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_rows_map_back() {
        let h = harness(true);
        h.remote
            .seed(
                "daily_summaries",
                vec![
                    json!({"date": "2024-01-01", "total_sales": 100, "counter_sales": 100, "supply_sales": 0, "products": []}),
                    json!({"date": "2024-01-03", "total_sales": 0, "counter_sales": 0, "supply_sales": 0, "products": []}),
                ],
            )
            .await;

        let all = h.ctx.summaries().get_all().await.unwrap().value;
        let dates: Vec<String> = all.iter().map(|s| s.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-01"]);
    }
}
