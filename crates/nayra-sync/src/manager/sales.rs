//! Sales ledger: append-only, no update or delete.

use chrono::Utc;
use tracing::{info, warn};

use nayra_core::{Collection, Product, Sale, SaleType};

use super::{Outcome, SyncContext, SyncOutcome};
use crate::error::SyncResult;

#[derive(Debug, Clone)]
pub struct SaleManager {
    ctx: SyncContext,
}

impl SaleManager {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn get_all(&self) -> SyncResult<Outcome<Vec<Sale>>> {
        self.ctx.get_all().await
    }

    /// Records `quantity` units of `product` at its current price.
    pub async fn record(
        &self,
        product: &Product,
        quantity: i64,
        sale_type: SaleType,
    ) -> SyncResult<Outcome<Sale>> {
        let sale = Sale::record(product, quantity, sale_type, Utc::now())?;
        self.add(sale).await
    }

    /// Appends a sale to the ledger.
    ///
    /// Offline, or when the remote insert fails, the sale also goes to the
    /// pending queue for replay on reconnect.
    pub async fn add(&self, sale: Sale) -> SyncResult<Outcome<Sale>> {
        let _guard = self.ctx.lock(Collection::Sales).await;

        let (stored, sync) = if self.ctx.is_online() {
            match self.ctx.adapter().insert_one(&sale).await {
                Ok(server) => (server, SyncOutcome::Synced),
                Err(e) => {
                    warn!(id = %sale.id, error = %e, "Remote sale insert failed, queueing");
                    self.enqueue(&sale).await?;
                    (sale, SyncOutcome::failed(&e))
                }
            }
        } else {
            self.enqueue(&sale).await?;
            (sale, SyncOutcome::Queued)
        };

        let mut sales: Vec<Sale> = self.ctx.cache().read().await?;
        sales.push(stored.clone());
        self.ctx.cache().write(&sales).await?;

        info!(
            id = %stored.id,
            product_id = %stored.product_id,
            quantity = stored.quantity,
            amount = %stored.amount,
            sync = %sync,
            "Sale recorded"
        );
        Ok(Outcome::new(stored, sync))
    }

    /// Sales waiting for replay, oldest first.
    pub async fn pending(&self) -> SyncResult<Vec<Sale>> {
        Ok(self.ctx.cache().pending::<Sale>().all().await?)
    }

    async fn enqueue(&self, sale: &Sale) -> SyncResult<()> {
        self.ctx.cache().pending::<Sale>().enqueue(sale).await?;
        self.ctx.tracker().mark_dirty(Collection::Sales).await?;
        Ok(())
    }
}
