//! Investment growth engine.
//!
//! Profit accrues linearly over a fixed 7-day window (10,080 minutes) up to a
//! fixed 35% total return. Each tick recomputes from absolute elapsed wall-clock
//! time, so the computation is a pure function of `(amount, start_time, now)`:
//! skipped or repeated ticks cannot drift the value.

use tracing::{debug, info};

use crate::Amount;
use crate::model::{InvestmentStatus, UserRecord};
use crate::wallet::withdrawable_amount;

mod scheduler;
pub use scheduler::{Session, SessionTiming};

/// Length of the accrual window in minutes (7 days).
pub const ACCRUAL_WINDOW_MINUTES: i64 = 10_080;

/// Total return over the full window, in percent.
pub const TOTAL_RETURN_PCT: i64 = 35;

/// Result of evaluating the accrual formula at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accrual {
    pub profit: Amount,
    pub completed: bool,
}

/// Whole minutes elapsed since `start_time_ms`, clamped at zero.
pub fn elapsed_minutes(start_time_ms: i64, now_ms: i64) -> i64 {
    (now_ms - start_time_ms).max(0) / 60_000
}

/// Evaluate the accrual contract:
///
/// ```text
/// raw    = amount * 35% / 10_080 * elapsed_minutes
/// profit = min(raw, amount * 35%), rounded to the cent
/// ```
///
/// Completion is reached once the full window has elapsed, at which point the
/// profit is exactly the capped maximum.
pub fn accrue(amount: Amount, start_time_ms: i64, now_ms: i64) -> Accrual {
    let elapsed = elapsed_minutes(start_time_ms, now_ms);
    let max_profit = amount.mul_ratio(TOTAL_RETURN_PCT, 100);

    if elapsed >= ACCRUAL_WINDOW_MINUTES {
        return Accrual {
            profit: max_profit,
            completed: true,
        };
    }

    let raw = amount.mul_ratio(TOTAL_RETURN_PCT * elapsed, 100 * ACCRUAL_WINDOW_MINUTES);
    Accrual {
        profit: raw.min(max_profit),
        completed: false,
    }
}

/// Point-in-time view of a session, published to subscribers on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSnapshot {
    pub amount: Amount,
    pub profit: Amount,
    pub status: InvestmentStatus,
    pub completed: bool,
    /// Principal plus accrued profit.
    pub investment_value: Amount,
    /// Derived per read, never persisted.
    pub withdrawable: Amount,
}

/// The growth engine for a single user session.
///
/// Owns the in-memory user record and applies accrual ticks to it. The engine
/// never talks to the row-store itself; persistence belongs to the scheduler.
pub struct Engine {
    user: UserRecord,
}

impl Engine {
    pub fn new(user: UserRecord) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn into_user(self) -> UserRecord {
        self.user
    }

    /// Current view without applying a tick.
    pub fn snapshot(&self) -> EngineSnapshot {
        let inv = &self.user.investment;
        EngineSnapshot {
            amount: inv.amount,
            profit: inv.profit,
            status: inv.status,
            completed: inv.completed,
            investment_value: inv.value(),
            withdrawable: withdrawable_amount(
                std::slice::from_ref(inv),
                self.user.registration_bonus,
            ),
        }
    }

    /// Apply one accrual tick at `now_ms`.
    ///
    /// Returns `None` when there is no valid active investment (the caller
    /// should stop scheduling). A tick never moves the lifecycle backward: the
    /// record is only touched while accruing and is frozen on completion.
    pub fn tick(&mut self, now_ms: i64) -> Option<EngineSnapshot> {
        if !self.user.investment.is_accruing() {
            return None;
        }

        let inv = &mut self.user.investment;
        let accrual = accrue(inv.amount, inv.start_time, now_ms);

        inv.profit = accrual.profit;
        inv.completed = accrual.completed;
        if accrual.completed {
            inv.status = InvestmentStatus::Completed;
            info!(
                user = %self.user.id,
                profit = %accrual.profit,
                "investment window elapsed, accrual complete"
            );
        } else {
            debug!(
                user = %self.user.id,
                profit = %accrual.profit,
                "accrual tick applied"
            );
        }

        Some(self.snapshot())
    }
}
