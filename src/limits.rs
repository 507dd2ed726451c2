use time::{Date, OffsetDateTime};

use crate::constants::NOTIFICATIONS_FILE;
use crate::models::{BudgetLimits, LimitAlert, Notification};
use crate::notifications::load_notifications;
use crate::settings::load_limits;
use crate::storage::Storage;

/// Rolling expense totals for the windows ending today, computed over the
/// collection that already includes the expense being evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingTotals {
    pub today: f64,
    pub week: f64,
    pub month: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPeriod {
    Daily,
    Weekly,
    Monthly,
}

pub const ALL_PERIODS: [LimitPeriod; 3] = [
    LimitPeriod::Daily,
    LimitPeriod::Weekly,
    LimitPeriod::Monthly,
];

impl LimitPeriod {
    pub fn title(self) -> &'static str {
        match self {
            LimitPeriod::Daily => "Daily Limit",
            LimitPeriod::Weekly => "Weekly Limit",
            LimitPeriod::Monthly => "Monthly Limit",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            LimitPeriod::Daily => "daily",
            LimitPeriod::Weekly => "weekly",
            LimitPeriod::Monthly => "monthly",
        }
    }

    pub fn configured_limit(self, limits: &BudgetLimits) -> f64 {
        match self {
            LimitPeriod::Daily => limits.daily,
            LimitPeriod::Weekly => limits.weekly,
            LimitPeriod::Monthly => limits.monthly,
        }
    }

    pub fn total(self, totals: &RollingTotals) -> f64 {
        match self {
            LimitPeriod::Daily => totals.today,
            LimitPeriod::Weekly => totals.week,
            LimitPeriod::Monthly => totals.month,
        }
    }

    /// Calendar period key, the de-duplication unit for notifications.
    /// Weeks use the ISO convention (Monday start), matching the rolling
    /// weekly window.
    pub fn key(self, today: Date) -> String {
        match self {
            LimitPeriod::Daily => format!(
                "{:04}-{:02}-{:02}",
                today.year(),
                today.month() as u8,
                today.day()
            ),
            LimitPeriod::Weekly => {
                let (year, week, _) = today.to_iso_week_date();
                format!("{:04}-W{:02}", year, week)
            }
            LimitPeriod::Monthly => format!("{:04}-{:02}", today.year(), today.month() as u8),
        }
    }
}

/// Time-based notification id; the sequence suffix keeps ids distinct when
/// several notifications are created within one timestamp tick.
pub fn notification_id(now: OffsetDateTime, sequence: usize) -> String {
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}{:06}_{}",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        now.microsecond(),
        sequence
    )
}

pub fn has_notification_for(notifications: &[Notification], title: &str, period_key: &str) -> bool {
    notifications
        .iter()
        .any(|n| n.title == title && n.date == period_key)
}

/// Evaluate rolling totals against the user's configured limits.
///
/// Every period whose total strictly exceeds its non-zero limit is reported
/// in the returned list. A notification is appended only when none exists for
/// the same title and period key, so repeated qualifying writes within one
/// period produce exactly one notification. A failed append is logged and
/// does not fail the caller; the next qualifying write retries it.
pub async fn check_limits(
    storage: &dyn Storage,
    user_id: i64,
    totals: RollingTotals,
    today: Date,
) -> Vec<LimitAlert> {
    let limits = load_limits(storage, user_id).await;
    let notifications = load_notifications(storage, user_id).await;
    let now = OffsetDateTime::now_utc();

    let mut alerts = Vec::new();
    let mut appended = 0usize;

    for period in ALL_PERIODS {
        let limit = period.configured_limit(&limits);
        if limit <= 0.0 {
            continue;
        }

        let total = period.total(&totals);
        if total <= limit {
            continue;
        }

        let period_key = period.key(today);
        let detail = format!(
            "You have exceeded your {} expense limit of {}.",
            period.noun(),
            limit
        );
        alerts.push(LimitAlert {
            title: period.title().to_string(),
            detail: detail.clone(),
            date: period_key.clone(),
        });

        if has_notification_for(&notifications, period.title(), &period_key) {
            continue;
        }

        let notification = Notification {
            id: notification_id(now, notifications.len() + appended + 1),
            title: period.title().to_string(),
            detail,
            is_read: false,
            date: period_key,
            read_at: None,
        };

        match serde_json::to_value(&notification) {
            Ok(value) => {
                if storage.append_one(user_id, NOTIFICATIONS_FILE, value).await {
                    appended += 1;
                } else {
                    tracing::warn!(
                        user_id,
                        title = period.title(),
                        "limit notification append failed; changes may be lost"
                    );
                }
            }
            Err(err) => {
                tracing::error!(user_id, error = %err, "failed to encode limit notification");
            }
        }
    }

    alerts
}
