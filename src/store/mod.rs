//! Row-store collaborator boundary.
//!
//! The engine persists through an external hosted table of user rows. The
//! [`RowStore`] trait is the seam: production uses the PostgREST-backed
//! [`SupabaseStore`], tests plug in an in-memory implementation.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::model::{Investment, Role, UserId, UserRecord, UserStatus, Wallet};

mod supabase;
pub use supabase::SupabaseStore;

/// Errors from the remote row-store. All of them are transient from the
/// engine's point of view: a failed push is swallowed and the next scheduled
/// push retries with then-current values.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("row-store error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("user {0} not found")]
    RowMissing(UserId),

    #[error("api key is not a valid header value")]
    InvalidApiKey,
}

/// Partial update of a user row. Only the set columns are sent; untouched
/// fields are merged server-side, never replaced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment: Option<Investment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Wallet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_investment(mut self, investment: Investment) -> Self {
        self.investment = Some(investment);
        self
    }

    pub fn with_wallet(mut self, wallet: Wallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Filter for row listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl ListFilter {
    /// Query parameters in PostgREST `column=eq.value` form.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(role) = self.role {
            pairs.push(("role", format!("eq.{}", role.as_str())));
        }
        if let Some(status) = self.status {
            pairs.push(("status", format!("eq.{}", status.as_str())));
        }
        pairs
    }
}

/// The external table of user rows.
pub trait RowStore {
    /// Fetch a single user row by id.
    fn fetch_user(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Fetch all user rows matching the filter, ordered by email.
    fn fetch_all(
        &self,
        filter: ListFilter,
    ) -> impl Future<Output = Result<Vec<UserRecord>, StoreError>> + Send;

    /// Apply a partial update to a user row and return the merged row.
    fn update_user(
        &self,
        id: &str,
        patch: &UserPatch,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Delete a user row.
    fn delete_user(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
