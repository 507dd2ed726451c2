use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// A single expense record. The id is assigned by the store and stays unique
/// within a user's collection even after deletions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExpensePayload {
    pub amount: f64,
    pub description: String,
    pub date: Date,
    pub category: Option<String>,
}

/// Per-user budget limits. Zero means "no limit, never trigger".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BudgetLimits {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        BudgetLimits {
            daily: 0.0,
            weekly: 0.0,
            monthly: 0.0,
        }
    }
}

/// Append-only per-user notification. `date` holds the period key the
/// notification was emitted for and doubles as the de-duplication unit.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub detail: String,
    #[serde(default)]
    pub is_read: bool,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<OffsetDateTime>,
}

/// One period whose configured limit is currently exceeded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LimitAlert {
    pub title: String,
    pub detail: String,
    pub date: String,
}

/// Response envelope for expense creation. `details` always carries the full
/// per-period breakdown, even for periods whose notification was suppressed
/// as a duplicate.
#[derive(Serialize, Debug)]
pub struct CreateExpenseResponse {
    pub expense: Expense,
    pub limit_exceeded: bool,
    pub details: Vec<LimitAlert>,
}

#[derive(Deserialize, Debug)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct RenameCategoryPayload {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Serialize, Debug)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

#[derive(Serialize, Debug)]
pub struct ImportResponse {
    pub imported: usize,
}
