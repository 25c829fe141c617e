//! # Session Rules
//!
//! Roles, the credential table and the route guard.
//!
//! ## Route Surface
//! ```text
//! ┌──────────────┬──────────────────┬─────────────────────────────────────┐
//! │ Route        │ Needs            │ Otherwise                           │
//! ├──────────────┼──────────────────┼─────────────────────────────────────┤
//! │ /login       │ nothing          │                                     │
//! │ /            │ any role         │ → /login                            │
//! │ /sales       │ any role         │ → /login                            │
//! │ /inventory   │ admin            │ → /login (absent), → / (employee)   │
//! │ /reports     │ admin            │ → /login (absent), → / (employee)   │
//! │ /settings    │ admin            │ → /login (absent), → / (employee)   │
//! └──────────────┴──────────────────┴─────────────────────────────────────┘
//! ```
//!
//! The guard is a pure function of `(role, route)`; where the role is kept
//! (and how it is restored on start) is the app's concern.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Role
// =============================================================================

/// Operator role granted by a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Employee => write!(f, "employee"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "employee".to_string()],
            }),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// One login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// The fixed set of accounts the login screen checks against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTable {
    accounts: Vec<Account>,
}

impl AccountTable {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// Returns the role of the account matching both username and password.
    ///
    /// ## Example
    /// ```rust
    /// use nayra_core::session::{AccountTable, Role};
    ///
    /// let accounts = AccountTable::default();
    /// assert_eq!(accounts.authenticate("nayra", "nayra123").unwrap(), Role::Employee);
    /// assert!(accounts.authenticate("nayra", "wrong").is_err());
    /// ```
    pub fn authenticate(&self, username: &str, password: &str) -> CoreResult<Role> {
        self.accounts
            .iter()
            .find(|a| a.username == username && a.password == password)
            .map(|a| a.role)
            .ok_or(CoreError::InvalidCredentials)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountTable {
    fn default() -> Self {
        Self::new(vec![
            Account::new("admin", "admin123", Role::Admin),
            Account::new("nayra", "nayra123", Role::Employee),
        ])
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Inventory,
    Sales,
    Reports,
    Settings,
}

impl Route {
    pub const fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Inventory => "/inventory",
            Route::Sales => "/sales",
            Route::Reports => "/reports",
            Route::Settings => "/settings",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/login" => Some(Route::Login),
            "/" => Some(Route::Dashboard),
            "/inventory" => Some(Route::Inventory),
            "/sales" => Some(Route::Sales),
            "/reports" => Some(Route::Reports),
            "/settings" => Some(Route::Settings),
            _ => None,
        }
    }

    /// Whether the route is restricted to admins.
    pub const fn admin_only(&self) -> bool {
        matches!(self, Route::Inventory | Route::Reports | Route::Settings)
    }

    const fn public(&self) -> bool {
        matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of checking a role against a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(Route),
}

impl Access {
    /// Converts a redirect into [`CoreError::AccessDenied`] for `route`.
    pub fn into_result(self, route: Route) -> CoreResult<()> {
        match self {
            Access::Granted => Ok(()),
            Access::Redirect(to) => Err(CoreError::AccessDenied {
                route: route.path().to_string(),
                redirect: to.path().to_string(),
            }),
        }
    }
}

/// Decides whether `role` may open `route`.
pub fn guard(role: Option<Role>, route: Route) -> Access {
    if route.public() {
        return Access::Granted;
    }
    match role {
        None => Access::Redirect(Route::Login),
        Some(role) if route.admin_only() && !role.is_admin() => Access::Redirect(Route::Dashboard),
        Some(_) => Access::Granted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts() {
        let accounts = AccountTable::default();
        assert_eq!(accounts.authenticate("admin", "admin123").unwrap(), Role::Admin);
        assert_eq!(accounts.authenticate("nayra", "nayra123").unwrap(), Role::Employee);
        assert!(matches!(
            accounts.authenticate("admin", "nayra123"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_employee_redirected_from_admin_routes() {
        let employee = Some(Role::Employee);
        assert_eq!(guard(employee, Route::Inventory), Access::Redirect(Route::Dashboard));
        assert_eq!(guard(employee, Route::Reports), Access::Redirect(Route::Dashboard));
        assert_eq!(guard(employee, Route::Settings), Access::Redirect(Route::Dashboard));
        assert_eq!(guard(employee, Route::Sales), Access::Granted);
        assert_eq!(guard(employee, Route::Dashboard), Access::Granted);
    }

    #[test]
    fn test_absent_role_redirected_to_login() {
        assert_eq!(guard(None, Route::Sales), Access::Redirect(Route::Login));
        assert_eq!(guard(None, Route::Inventory), Access::Redirect(Route::Login));
        assert_eq!(guard(None, Route::Login), Access::Granted);
    }

    #[test]
    fn test_admin_everywhere() {
        for route in [Route::Dashboard, Route::Inventory, Route::Sales, Route::Reports, Route::Settings] {
            assert_eq!(guard(Some(Role::Admin), route), Access::Granted);
        }
    }

    #[test]
    fn test_paths_round_trip() {
        assert_eq!(Route::from_path("/inventory"), Some(Route::Inventory));
        assert_eq!(Route::from_path("/nope"), None);
        assert_eq!(Route::Dashboard.to_string(), "/");
    }

    #[test]
    fn test_redirect_into_error() {
        let err = guard(Some(Role::Employee), Route::Inventory)
            .into_result(Route::Inventory)
            .unwrap_err();
        assert_eq!(err.to_string(), "Access to /inventory denied, redirecting to /");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"employee\"");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("\"employee\"".parse::<Role>().unwrap(), Role::Employee);
        assert!("root".parse::<Role>().is_err());
    }
}
