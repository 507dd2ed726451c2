/*!
 * Limit Checker Integration Tests
 *
 * Exercises the budget-limit evaluation and notification engine end to end
 * against isolated filesystem storage: threshold boundaries, per-period
 * de-duplication, suppressed-but-still-reported periods, and the interplay
 * with expense writes.
 */

mod common;

use common::*;
use expense_tracker_server::expenses::add_expense;
use expense_tracker_server::limits::{LimitPeriod, RollingTotals, check_limits};
use expense_tracker_server::notifications::load_notifications;
use expense_tracker_server::utils::today_utc;

#[tokio::test]
async fn zero_limits_never_trigger() {
    let (storage, _data_path) = setup_test_storage();
    // defaulted settings: all limits zero
    let totals = RollingTotals {
        today: 1_000_000.0,
        week: 1_000_000.0,
        month: 1_000_000.0,
    };

    let alerts = check_limits(storage.as_ref(), TEST_USER_ID, totals, today_utc()).await;

    assert!(alerts.is_empty());
    assert!(
        load_notifications(storage.as_ref(), TEST_USER_ID)
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn total_equal_to_limit_does_not_trigger() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 100.0, 0.0, 0.0).await;

    let totals = RollingTotals {
        today: 100.0,
        week: 100.0,
        month: 100.0,
    };
    let alerts = check_limits(storage.as_ref(), TEST_USER_ID, totals, today_utc()).await;

    assert!(alerts.is_empty());
}

#[tokio::test]
async fn total_strictly_above_limit_triggers() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 100.0, 0.0, 0.0).await;
    let today = today_utc();

    let totals = RollingTotals {
        today: 100.01,
        week: 100.01,
        month: 100.01,
    };
    let alerts = check_limits(storage.as_ref(), TEST_USER_ID, totals, today).await;

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Daily Limit");
    assert_eq!(alerts[0].date, LimitPeriod::Daily.key(today));
    assert!(alerts[0].detail.contains("100"));

    let notifications = load_notifications(storage.as_ref(), TEST_USER_ID).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Daily Limit");
    assert!(!notifications[0].is_read);
}

#[tokio::test]
async fn repeated_check_creates_only_one_notification_per_period() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 50.0, 0.0, 0.0).await;
    let today = today_utc();
    let totals = RollingTotals {
        today: 75.0,
        week: 75.0,
        month: 75.0,
    };

    let first = check_limits(storage.as_ref(), TEST_USER_ID, totals, today).await;
    let second = check_limits(storage.as_ref(), TEST_USER_ID, totals, today).await;

    // both calls report the exceeded period, only the first appended
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(
        load_notifications(storage.as_ref(), TEST_USER_ID)
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn all_three_periods_can_trigger_in_one_call() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 10.0, 20.0, 30.0).await;
    let today = today_utc();

    let totals = RollingTotals {
        today: 40.0,
        week: 40.0,
        month: 40.0,
    };
    let alerts = check_limits(storage.as_ref(), TEST_USER_ID, totals, today).await;

    let titles: Vec<&str> = alerts.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Daily Limit", "Weekly Limit", "Monthly Limit"]);

    let notifications = load_notifications(storage.as_ref(), TEST_USER_ID).await;
    assert_eq!(notifications.len(), 3);

    // notification ids stay distinct within a single check
    let mut ids: Vec<&str> = notifications.iter().map(|n| n.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn preexisting_notification_suppresses_append_but_not_reporting() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 0.0, 100.0, 0.0).await;
    let today = today_utc();
    let week_key = LimitPeriod::Weekly.key(today);

    seed_notification(&storage, TEST_USER_ID, "Weekly Limit", &week_key, false).await;

    let totals = RollingTotals {
        today: 0.0,
        week: 150.0,
        month: 150.0,
    };
    let alerts = check_limits(storage.as_ref(), TEST_USER_ID, totals, today).await;

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Weekly Limit");
    assert_eq!(alerts[0].date, week_key);
    assert_eq!(
        load_notifications(storage.as_ref(), TEST_USER_ID)
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn notification_for_another_period_key_does_not_suppress() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 100.0, 0.0, 0.0).await;
    let today = today_utc();

    // same title, different day
    seed_notification(&storage, TEST_USER_ID, "Daily Limit", "1999-01-01", true).await;

    let totals = RollingTotals {
        today: 150.0,
        week: 150.0,
        month: 150.0,
    };
    let alerts = check_limits(storage.as_ref(), TEST_USER_ID, totals, today).await;

    assert_eq!(alerts.len(), 1);
    let notifications = load_notifications(storage.as_ref(), TEST_USER_ID).await;
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[1].date, LimitPeriod::Daily.key(today));
}

#[tokio::test]
async fn daily_limit_scenario_across_three_writes() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 100.0, 0.0, 0.0).await;
    let today = today_utc();

    // 60: under the limit
    let (_, details) = add_expense(
        storage.as_ref(),
        TEST_USER_ID,
        expense_payload(60.0, "Groceries", today, Some("Food & Dining")),
    )
    .await
    .expect("Failed to add first expense");
    assert!(details.is_empty());
    assert!(
        load_notifications(storage.as_ref(), TEST_USER_ID)
            .await
            .is_empty()
    );

    // 60 + 50 = 110: daily limit newly exceeded
    let (_, details) = add_expense(
        storage.as_ref(),
        TEST_USER_ID,
        expense_payload(50.0, "Dinner", today, Some("Food & Dining")),
    )
    .await
    .expect("Failed to add second expense");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].title, "Daily Limit");

    let notifications = load_notifications(storage.as_ref(), TEST_USER_ID).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].date, LimitPeriod::Daily.key(today));

    // 110 + 10 = 120: still exceeded, reported, but no second notification
    let (_, details) = add_expense(
        storage.as_ref(),
        TEST_USER_ID,
        expense_payload(10.0, "Snack", today, Some("Food & Dining")),
    )
    .await
    .expect("Failed to add third expense");
    assert_eq!(details.len(), 1);
    assert_eq!(
        load_notifications(storage.as_ref(), TEST_USER_ID)
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn weekly_limit_triggers_through_expense_writes() {
    let (storage, _data_path) = setup_test_storage();
    seed_limits(&storage, TEST_USER_ID, 0.0, 100.0, 0.0).await;
    let today = today_utc();

    add_expense(
        storage.as_ref(),
        TEST_USER_ID,
        expense_payload(70.0, "Concert", today, Some("Entertainment")),
    )
    .await
    .expect("Failed to add first expense");
    let (_, details) = add_expense(
        storage.as_ref(),
        TEST_USER_ID,
        expense_payload(40.0, "Taxi", today, Some("Transportation")),
    )
    .await
    .expect("Failed to add second expense");

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].title, "Weekly Limit");
    assert_eq!(details[0].date, LimitPeriod::Weekly.key(today));

    let notifications = load_notifications(storage.as_ref(), TEST_USER_ID).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Weekly Limit");
}
