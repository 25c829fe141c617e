//! # Session Repository
//!
//! The persisted role of the logged-in operator (`userRole`), stored as the
//! bare role name (`admin` / `employee`).

use tracing::{debug, warn};

use nayra_core::Role;

use crate::cache::LocalCache;
use crate::error::DbResult;
use crate::keys::ROLE_KEY;

#[derive(Debug, Clone)]
pub struct SessionRepository {
    cache: LocalCache,
}

impl SessionRepository {
    pub fn new(cache: LocalCache) -> Self {
        Self { cache }
    }

    /// Returns the persisted role.
    ///
    /// An unrecognized value is treated as "not logged in"; the operator
    /// simply logs in again.
    pub async fn role(&self) -> DbResult<Option<Role>> {
        let Some(raw) = self.cache.store().get(ROLE_KEY).await? else {
            return Ok(None);
        };
        match raw.parse::<Role>() {
            Ok(role) => Ok(Some(role)),
            Err(_) => {
                warn!(value = %raw, "Ignoring unrecognized session role");
                Ok(None)
            }
        }
    }

    pub async fn set_role(&self, role: Role) -> DbResult<()> {
        debug!(%role, "Persisting session role");
        self.cache.store().put(ROLE_KEY, &role.to_string()).await
    }

    pub async fn clear(&self) -> DbResult<()> {
        self.cache.remove(ROLE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_role_lifecycle() {
        let store = MemoryStore::new();
        let session = LocalCache::new(Arc::new(store.clone())).session();
        assert_eq!(session.role().await.unwrap(), None);

        session.set_role(Role::Employee).await.unwrap();
        assert_eq!(session.role().await.unwrap(), Some(Role::Employee));
        assert_eq!(store.get(ROLE_KEY).await.unwrap().as_deref(), Some("employee"));

        session.clear().await.unwrap();
        assert_eq!(session.role().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_garbage_role_reads_as_absent() {
        let store = MemoryStore::new();
        store.put(ROLE_KEY, "superuser").await.unwrap();
        let session = LocalCache::new(Arc::new(store)).session();
        assert_eq!(session.role().await.unwrap(), None);
    }
}
