//! Product catalog: the only collection edited in place.

use tracing::{info, warn};

use nayra_core::update::apply_updates;
use nayra_core::{Collection, NewProduct, Product, ProductUpdate};

use super::{Outcome, SyncContext, SyncOutcome};
use crate::error::SyncResult;

#[derive(Debug, Clone)]
pub struct ProductManager {
    ctx: SyncContext,
}

impl ProductManager {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    pub async fn get_all(&self) -> SyncResult<Outcome<Vec<Product>>> {
        self.ctx.get_all().await
    }

    /// Adds a product under a fresh id.
    ///
    /// Online, the remote insert goes first and the server's copy is what
    /// lands in the cache.
    pub async fn add(&self, new: NewProduct) -> SyncResult<Outcome<Product>> {
        let local = new.into_product();
        let _guard = self.ctx.lock(Collection::Products).await;

        let (stored, sync) = if self.ctx.is_online() {
            match self.ctx.adapter().insert_one(&local).await {
                Ok(server) => (server, SyncOutcome::Synced),
                Err(e) => {
                    warn!(product = %local.name, error = %e, "Remote product insert failed, keeping local copy");
                    self.ctx.tracker().mark_dirty(Collection::Products).await?;
                    (local, SyncOutcome::failed(&e))
                }
            }
        } else {
            self.ctx.tracker().mark_dirty(Collection::Products).await?;
            (local, SyncOutcome::Offline)
        };

        let mut products: Vec<Product> = self.ctx.cache().read().await?;
        products.push(stored.clone());
        self.ctx.cache().write(&products).await?;

        info!(id = %stored.id, name = %stored.name, sync = %sync, "Product added");
        Ok(Outcome::new(stored, sync))
    }

    /// Removes a product from the cache and, best effort, from the remote.
    ///
    /// The value is whether the product was in the cache.
    pub async fn remove(&self, id: &str) -> SyncResult<Outcome<bool>> {
        let _guard = self.ctx.lock(Collection::Products).await;

        let mut products: Vec<Product> = self.ctx.cache().read().await?;
        let before = products.len();
        products.retain(|p| p.id != id);
        let removed = products.len() != before;
        self.ctx.cache().write(&products).await?;

        let sync = if self.ctx.is_online() {
            match self.ctx.adapter().delete_one::<Product>(id).await {
                Ok(()) => SyncOutcome::Synced,
                Err(e) => {
                    warn!(id, error = %e, "Remote product delete failed");
                    self.defer_removal(id).await?;
                    SyncOutcome::failed(&e)
                }
            }
        } else {
            self.defer_removal(id).await?;
            SyncOutcome::Offline
        };

        info!(id, removed, sync = %sync, "Product removed");
        Ok(Outcome::new(removed, sync))
    }

    /// Overwrites the catalog and, when online, upserts every product.
    pub async fn save_all(&self, products: Vec<Product>) -> SyncResult<Outcome<Vec<Product>>> {
        let _guard = self.ctx.lock(Collection::Products).await;
        self.save_all_locked(products).await
    }

    /// Applies typed field edits to the cached catalog, all or nothing.
    pub async fn apply_updates(
        &self,
        updates: &[(String, ProductUpdate)],
    ) -> SyncResult<Outcome<Vec<Product>>> {
        let _guard = self.ctx.lock(Collection::Products).await;

        let mut products: Vec<Product> = self.ctx.cache().read().await?;
        apply_updates(&mut products, updates)?;
        self.save_all_locked(products).await
    }

    async fn save_all_locked(&self, products: Vec<Product>) -> SyncResult<Outcome<Vec<Product>>> {
        self.ctx.cache().write(&products).await?;

        let sync = if self.ctx.is_online() {
            match self.ctx.adapter().upsert_many(&products).await {
                Ok(()) => SyncOutcome::Synced,
                Err(e) => {
                    warn!(count = products.len(), error = %e, "Remote product upsert failed");
                    self.ctx.tracker().mark_dirty(Collection::Products).await?;
                    SyncOutcome::failed(&e)
                }
            }
        } else {
            self.ctx.tracker().mark_dirty(Collection::Products).await?;
            SyncOutcome::Offline
        };

        Ok(Outcome::new(products, sync))
    }

    async fn defer_removal(&self, id: &str) -> SyncResult<()> {
        self.ctx.cache().tombstones::<Product>().add(id).await?;
        self.ctx.tracker().mark_dirty(Collection::Products).await?;
        Ok(())
    }
}
