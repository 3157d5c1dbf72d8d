//! User-management operations.
//!
//! These run with the caller's role as the only authority, matching the trust
//! model of the rest of the crate: a super admin approves investments and
//! manages users, a super admin row itself can never be modified or deleted.

use thiserror::Error;
use tracing::{info, warn};

use crate::Amount;
use crate::model::{
    Investment, InvestmentStatus, Role, UserRecord, UserStatus, normalize_email,
};
use crate::store::{ListFilter, RowStore, StoreError, UserPatch};

/// Referrer's commission on a newly approved investment, in percent.
pub const REFERRAL_COMMISSION_PCT: i64 = 20;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("super admin permission required")]
    PermissionDenied,

    #[error("super admin records cannot be modified")]
    ProtectedRecord,

    #[error("user {0} not found")]
    UserNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn require_super_admin(actor: &UserRecord) -> Result<(), AdminError> {
    if actor.role == Role::SuperAdmin {
        Ok(())
    } else {
        Err(AdminError::PermissionDenied)
    }
}

async fn load_target<S: RowStore>(store: &S, user_id: &str) -> Result<UserRecord, AdminError> {
    store
        .fetch_user(user_id)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(user_id.to_string()))
}

/// Approve an investment: activate it with `start_time = now` and zero profit,
/// persist it, and credit the referral commission if the investor was referred.
///
/// The referral credit is best-effort; a failure there never undoes the
/// approval itself.
pub async fn approve_investment<S: RowStore>(
    store: &S,
    actor: &UserRecord,
    user_id: &str,
    amount: Amount,
    now_ms: i64,
) -> Result<Investment, AdminError> {
    require_super_admin(actor)?;
    let target = load_target(store, user_id).await?;

    let investment = Investment {
        amount,
        start_time: now_ms,
        status: InvestmentStatus::Active,
        profit: Amount::ZERO,
        completed: false,
    };
    store
        .update_user(user_id, &UserPatch::new().with_investment(investment))
        .await?;
    info!(user = %user_id, amount = %amount, "investment approved and activated");

    credit_referrer(store, &target, amount).await;

    Ok(investment)
}

async fn credit_referrer<S: RowStore>(store: &S, investor: &UserRecord, amount: Amount) {
    let Some(referred_by) = investor.wallet.referred_by.as_deref() else {
        return;
    };
    let referred_by = normalize_email(referred_by);

    let users = match store.fetch_all(ListFilter::default()).await {
        Ok(users) => users,
        Err(err) => {
            warn!(reason = %err, "could not list users for referral lookup");
            return;
        }
    };
    let Some(referrer) = users
        .into_iter()
        .find(|u| normalize_email(&u.email) == referred_by)
    else {
        return;
    };

    let commission = amount.mul_ratio(REFERRAL_COMMISSION_PCT, 100);
    let mut wallet = referrer.wallet.clone();
    wallet.balance += commission;

    match store
        .update_user(&referrer.id, &UserPatch::new().with_wallet(wallet))
        .await
    {
        Ok(_) => info!(
            referrer = %referrer.id,
            commission = %commission,
            "referral commission credited"
        ),
        Err(err) => warn!(
            referrer = %referrer.id,
            reason = %err,
            "failed to credit referral commission"
        ),
    }
}

/// Change a user's role. Never allowed against a super admin row.
pub async fn set_user_role<S: RowStore>(
    store: &S,
    actor: &UserRecord,
    user_id: &str,
    role: Role,
) -> Result<UserRecord, AdminError> {
    require_super_admin(actor)?;
    let target = load_target(store, user_id).await?;
    if target.role == Role::SuperAdmin {
        return Err(AdminError::ProtectedRecord);
    }

    let updated = store
        .update_user(user_id, &UserPatch::new().with_role(role))
        .await?;
    info!(user = %user_id, role = role.as_str(), "user role updated");
    Ok(updated)
}

/// Activate or suspend a user. Never allowed against a super admin row.
pub async fn set_user_status<S: RowStore>(
    store: &S,
    actor: &UserRecord,
    user_id: &str,
    status: UserStatus,
) -> Result<UserRecord, AdminError> {
    require_super_admin(actor)?;
    let target = load_target(store, user_id).await?;
    if target.role == Role::SuperAdmin {
        return Err(AdminError::ProtectedRecord);
    }

    let updated = store
        .update_user(user_id, &UserPatch::new().with_status(status))
        .await?;
    info!(user = %user_id, status = status.as_str(), "user status updated");
    Ok(updated)
}

/// Delete a user row. Never allowed against a super admin row.
pub async fn delete_user<S: RowStore>(
    store: &S,
    actor: &UserRecord,
    user_id: &str,
) -> Result<(), AdminError> {
    require_super_admin(actor)?;
    let target = load_target(store, user_id).await?;
    if target.role == Role::SuperAdmin {
        return Err(AdminError::ProtectedRecord);
    }

    store.delete_user(user_id).await?;
    info!(user = %user_id, "user deleted");
    Ok(())
}
