//! # Request Identity
//!
//! The storefront trusts identity headers set by an upstream gateway
//! (authentication itself is outside this service):
//!
//! - `X-User-Id` - the authenticated user, absent for guests
//! - `X-User-Role` - `admin` for back-office staff, anything else is a
//!   regular customer
//!
//! Checkout requires a [`CurrentUser`]; the back-office endpoints require
//! an [`AdminUser`]. A guest hitting either gets 401, a non-admin hitting
//! the back-office gets 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// Role attached to the authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Customer,
}

/// The authenticated user for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: UserRole,
}

fn read_identity(parts: &Parts) -> Option<CurrentUser> {
    let id = parts
        .headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;

    let role = match parts.headers.get("x-user-role").and_then(|v| v.to_str().ok()) {
        Some("admin") => UserRole::Admin,
        _ => UserRole::Customer,
    };

    Some(CurrentUser {
        id: id.to_string(),
        role,
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        read_identity(parts).ok_or_else(|| ApiError::unauthorized("Please log in to continue"))
    }
}

/// An authenticated back-office user.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(AdminUser(user))
    }
}
