use std::path::PathBuf;
use std::sync::Arc;

use expense_tracker_server::filesystem::FilesystemStorage;
use expense_tracker_server::models::{BudgetLimits, ExpensePayload, Notification};
use expense_tracker_server::settings::replace_limits;
use expense_tracker_server::storage::SharedStorage;
use tempfile::tempdir;
use time::Date;

#[allow(dead_code)]
pub const TEST_USER_ID: i64 = 1;

/// Fresh filesystem storage rooted in an isolated temporary directory.
pub fn setup_test_storage() -> (SharedStorage, PathBuf) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir.path().to_path_buf();
    let storage: SharedStorage = Arc::new(FilesystemStorage::new(&data_path));

    // Keep the temp_dir alive by leaking it (for test duration)
    std::mem::forget(temp_dir);

    (storage, data_path)
}

#[allow(dead_code)]
pub fn expense_payload(
    amount: f64,
    description: &str,
    date: Date,
    category: Option<&str>,
) -> ExpensePayload {
    ExpensePayload {
        amount,
        description: description.to_string(),
        date,
        category: category.map(|c| c.to_string()),
    }
}

#[allow(dead_code)]
pub async fn seed_limits(
    storage: &SharedStorage,
    user_id: i64,
    daily: f64,
    weekly: f64,
    monthly: f64,
) {
    replace_limits(
        storage.as_ref(),
        user_id,
        BudgetLimits {
            daily,
            weekly,
            monthly,
        },
    )
    .await
    .expect("Failed to seed budget limits");
}

#[allow(dead_code)]
pub async fn seed_notification(
    storage: &SharedStorage,
    user_id: i64,
    title: &str,
    period_key: &str,
    is_read: bool,
) {
    let notification = Notification {
        id: format!("test_{}_{}", title.replace(' ', "_"), period_key),
        title: title.to_string(),
        detail: format!("Seeded {} notification", title),
        is_read,
        date: period_key.to_string(),
        read_at: None,
    };
    let value = serde_json::to_value(&notification).expect("Failed to encode notification");

    assert!(
        storage
            .append_one(
                user_id,
                expense_tracker_server::constants::NOTIFICATIONS_FILE,
                value
            )
            .await,
        "Failed to seed notification"
    );
}
