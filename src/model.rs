//! Core domain types for the investment growth engine.
//!
//! JSON field names mirror the hosted user table (camelCase columns inside the
//! `wallet` and `investment` jsonb values), so records round-trip unchanged.

use serde::{Deserialize, Deserializer, Serialize};

use crate::Amount;

/// User identifier. The hosted table may use numeric or uuid keys, so ids are
/// normalized to strings on deserialization.
pub type UserId = String;

fn deserialize_user_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UserId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

/// Lowercase + trim, so lookups by email are stable across sign-up quirks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lifecycle of an investment. Transitions only move forward:
/// inactive -> active (admin approval) -> completed (elapsed window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    #[default]
    Inactive,
    Active,
    Completed,
}

/// A single user's investment record as stored in the `investment` column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Investment {
    pub amount: Amount,
    /// Accrual start, unix milliseconds. Zero means "never activated".
    pub start_time: i64,
    pub status: InvestmentStatus,
    pub profit: Amount,
    pub completed: bool,
}

impl Investment {
    /// Whether the growth engine should run for this record.
    ///
    /// Missing, zero, or negative amount/start time counts as "no active
    /// investment"; completed records are frozen.
    pub fn is_accruing(&self) -> bool {
        self.status == InvestmentStatus::Active
            && self.amount.is_positive()
            && self.start_time > 0
            && !self.completed
    }

    /// Principal plus accrued profit.
    pub fn value(&self) -> Amount {
        self.amount + self.profit
    }
}

/// User's cash wallet as stored in the `wallet` column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Wallet {
    pub balance: Amount,
    pub pending: Amount,
    /// Email of the user who referred this one, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    SubAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::SubAdmin => "sub_admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }
}

/// A full user row from the remote table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(deserialize_with = "deserialize_user_id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub registration_bonus: Amount,
    #[serde(default)]
    pub wallet: Wallet,
    #[serde(default)]
    pub investment: Investment,
}
