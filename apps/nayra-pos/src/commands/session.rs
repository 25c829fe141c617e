//! # Session Commands
//!
//! Login screen and route checks.

use serde::Serialize;

use nayra_core::{Role, Route};

use crate::error::ApiError;
use crate::state::SessionContext;

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDto {
    pub requested: String,
    pub landed: String,
    pub redirected: bool,
}

pub async fn login(
    session: &mut SessionContext,
    username: &str,
    password: &str,
) -> Result<Role, ApiError> {
    session.login(username.trim(), password).await
}

pub async fn logout(session: &mut SessionContext) -> Result<(), ApiError> {
    session.logout().await
}

pub fn whoami(session: &SessionContext) -> Option<Role> {
    session.role()
}

/// Resolves a path such as `/inventory` against the session's role.
pub fn navigate(session: &SessionContext, path: &str) -> Result<NavigationDto, ApiError> {
    let route = Route::from_path(path.trim()).ok_or_else(|| ApiError::not_found("Route", path))?;
    let landed = session.navigate(route);
    Ok(NavigationDto {
        requested: route.path().to_string(),
        landed: landed.path().to_string(),
        redirected: landed != route,
    })
}
