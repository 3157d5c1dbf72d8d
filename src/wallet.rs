//! Withdrawable-amount rule.
//!
//! Derived per read from the investment records; never persisted.

use crate::Amount;
use crate::model::{Investment, InvestmentStatus};

/// Share of the principal available for early withdrawal while an investment
/// is still active, in percent.
pub const EARLY_WITHDRAWAL_PCT: i64 = 20;

/// Compute the withdrawable amount for a set of investment records.
///
/// - completed investment: full capital plus full profit;
/// - active investment: 20% of the principal (early-withdrawal cap);
/// - anything else contributes nothing.
///
/// The one-time registration bonus unlocks only once at least one investment
/// has ever completed.
pub fn withdrawable_amount(investments: &[Investment], registration_bonus: Amount) -> Amount {
    let mut total = Amount::ZERO;
    let mut has_completed = false;

    for inv in investments {
        match inv.status {
            InvestmentStatus::Completed => {
                has_completed = true;
                total += inv.amount + inv.profit;
            }
            InvestmentStatus::Active => {
                total += inv.amount.mul_ratio(EARLY_WITHDRAWAL_PCT, 100);
            }
            InvestmentStatus::Inactive => {}
        }
    }

    if has_completed {
        total += registration_bonus;
    }

    total
}
