//! Shared in-memory row-store for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use growth_eng::Amount;
use growth_eng::model::{Investment, InvestmentStatus, Role, UserRecord, UserStatus, Wallet};
use growth_eng::store::{ListFilter, RowStore, StoreError, UserPatch};

#[derive(Default)]
struct Inner {
    rows: Mutex<HashMap<String, UserRecord>>,
    fail_updates: AtomicBool,
    update_count: AtomicUsize,
}

/// In-memory [`RowStore`] with a scriptable update failure.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRecord) {
        self.inner
            .rows
            .lock()
            .unwrap()
            .insert(user.id.clone(), user);
    }

    pub fn get(&self, id: &str) -> Option<UserRecord> {
        self.inner.rows.lock().unwrap().get(id).cloned()
    }

    /// Make every subsequent update fail with a 503 until switched back.
    pub fn fail_updates(&self, fail: bool) {
        self.inner.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Number of updates that reached the store, failed ones included.
    pub fn update_count(&self) -> usize {
        self.inner.update_count.load(Ordering::SeqCst)
    }
}

impl RowStore for MemoryStore {
    fn fetch_user(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send {
        let row = self.get(id);
        async move { Ok(row) }
    }

    fn fetch_all(
        &self,
        filter: ListFilter,
    ) -> impl Future<Output = Result<Vec<UserRecord>, StoreError>> + Send {
        let mut rows: Vec<UserRecord> = self
            .inner
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.email.cmp(&b.email));
        async move { Ok(rows) }
    }

    fn update_user(
        &self,
        id: &str,
        patch: &UserPatch,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send {
        self.inner.update_count.fetch_add(1, Ordering::SeqCst);

        let result = if self.inner.fail_updates.load(Ordering::SeqCst) {
            Err(StoreError::Api {
                status: 503,
                body: "service unavailable".to_string(),
            })
        } else {
            let mut rows = self.inner.rows.lock().unwrap();
            match rows.get_mut(id) {
                Some(row) => {
                    if let Some(investment) = patch.investment {
                        row.investment = investment;
                    }
                    if let Some(wallet) = patch.wallet.clone() {
                        row.wallet = wallet;
                    }
                    if let Some(role) = patch.role {
                        row.role = role;
                    }
                    if let Some(status) = patch.status {
                        row.status = status;
                    }
                    Ok(row.clone())
                }
                None => Err(StoreError::RowMissing(id.to_string())),
            }
        };

        async move { result }
    }

    fn delete_user(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        let removed = self.inner.rows.lock().unwrap().remove(id);
        async move {
            match removed {
                Some(_) => Ok(()),
                None => Err(StoreError::RowMissing(id.to_string())),
            }
        }
    }
}

/// A user row with sensible defaults for tests.
pub fn user(id: &str, email: &str, role: Role) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        name: id.to_string(),
        email: email.to_string(),
        role,
        status: UserStatus::Active,
        registration_bonus: Amount::from_float(50.0),
        wallet: Wallet::default(),
        investment: Investment::default(),
    }
}

/// An active investment started `minutes_ago` minutes before now.
pub fn active_investment(amount: f64, minutes_ago: i64) -> Investment {
    Investment {
        amount: Amount::from_float(amount),
        start_time: chrono::Utc::now().timestamp_millis() - minutes_ago * 60_000,
        status: InvestmentStatus::Active,
        profit: Amount::ZERO,
        completed: false,
    }
}
