//! # Session Context
//!
//! The logged-in role, passed explicitly to every command.
//!
//! ```text
//!   restore() ── reads `userRole` ──► Some(role) / None
//!   login()   ── AccountTable ──────► persists role
//!   logout()  ──────────────────────► clears role
//!   require(route) ── guard ────────► Ok(role) / AccessDenied{redirect}
//! ```

use tracing::{debug, info};

use nayra_core::session::guard;
use nayra_core::{Access, AccountTable, CoreError, Role, Route};
use nayra_db::{LocalCache, SessionRepository};

use crate::error::ApiError;

#[derive(Debug)]
pub struct SessionContext {
    sessions: SessionRepository,
    accounts: AccountTable,
    role: Option<Role>,
}

impl SessionContext {
    /// Reads the persisted role, if any.
    pub async fn restore(cache: &LocalCache, accounts: AccountTable) -> Result<Self, ApiError> {
        let sessions = cache.session();
        let role = sessions.role().await?;
        debug!(?role, "Session restored");
        Ok(Self {
            sessions,
            accounts,
            role,
        })
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Role, ApiError> {
        let role = self.accounts.authenticate(username, password)?;
        self.sessions.set_role(role).await?;
        self.role = Some(role);
        info!(%role, "Logged in");
        Ok(role)
    }

    pub async fn logout(&mut self) -> Result<(), ApiError> {
        self.sessions.clear().await?;
        self.role = None;
        info!("Logged out");
        Ok(())
    }

    /// Where navigating to `route` actually lands.
    pub fn navigate(&self, route: Route) -> Route {
        match guard(self.role, route) {
            Access::Granted => route,
            Access::Redirect(to) => to,
        }
    }

    /// Checks that the session may open `route` and returns its role.
    pub fn require(&self, route: Route) -> Result<Role, ApiError> {
        guard(self.role, route).into_result(route)?;
        self.role.ok_or_else(|| {
            CoreError::AccessDenied {
                route: route.path().to_string(),
                redirect: Route::Login.path().to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use nayra_db::MemoryStore;
    use std::sync::Arc;

    fn cache() -> LocalCache {
        LocalCache::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_login_persists_across_restore() {
        let cache = cache();
        let mut session = SessionContext::restore(&cache, AccountTable::default()).await.unwrap();
        assert_eq!(session.role(), None);

        assert_eq!(session.login("nayra", "nayra123").await.unwrap(), Role::Employee);

        let restored = SessionContext::restore(&cache, AccountTable::default()).await.unwrap();
        assert_eq!(restored.role(), Some(Role::Employee));
    }

    #[tokio::test]
    async fn test_bad_password_keeps_previous_role() {
        let cache = cache();
        let mut session = SessionContext::restore(&cache, AccountTable::default()).await.unwrap();
        session.login("admin", "admin123").await.unwrap();

        let err = session.login("admin", "wrong").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(session.role(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_route_gate() {
        let cache = cache();
        let mut session = SessionContext::restore(&cache, AccountTable::default()).await.unwrap();

        assert_eq!(session.navigate(Route::Sales), Route::Login);
        assert_eq!(session.require(Route::Sales).unwrap_err().code, ErrorCode::AccessDenied);

        session.login("nayra", "nayra123").await.unwrap();
        assert_eq!(session.navigate(Route::Inventory), Route::Dashboard);
        assert_eq!(session.require(Route::Sales).unwrap(), Role::Employee);

        session.logout().await.unwrap();
        assert_eq!(session.navigate(Route::Dashboard), Route::Login);
        let restored = SessionContext::restore(&cache, AccountTable::default()).await.unwrap();
        assert_eq!(restored.role(), None);
    }
}
