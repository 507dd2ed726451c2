use axum::{Json, extract::State, http::StatusCode};
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::NOTIFICATIONS_FILE;
use crate::errors::ApiError;
use crate::models::{MarkAllReadResponse, Notification};
use crate::storage::{SharedStorage, Storage, load_records, save_records};

pub async fn load_notifications(storage: &dyn Storage, user_id: i64) -> Vec<Notification> {
    load_records(storage, user_id, NOTIFICATIONS_FILE).await
}

/// Flip every unread notification to read, stamping `read_at`. Returns the
/// number flipped; a second call flips zero.
pub async fn mark_all_notifications_read(
    storage: &dyn Storage,
    user_id: i64,
) -> Result<usize, ApiError> {
    let mut notifications = load_notifications(storage, user_id).await;
    let now = OffsetDateTime::now_utc();
    let mut updated = 0;

    for notification in &mut notifications {
        if !notification.is_read {
            notification.is_read = true;
            notification.read_at = Some(now);
            updated += 1;
        }
    }

    if updated > 0 {
        save_records(storage, user_id, NOTIFICATIONS_FILE, &notifications).await?;
    }

    Ok(updated)
}

pub async fn list_notifications(
    State(storage): State<SharedStorage>,
    session: Session,
) -> Result<(StatusCode, Json<Vec<Notification>>), ApiError> {
    let user = get_current_user(&session).await?;
    let notifications = load_notifications(storage.as_ref(), user.id).await;

    Ok((StatusCode::OK, Json(notifications)))
}

pub async fn mark_all_read(
    State(storage): State<SharedStorage>,
    session: Session,
) -> Result<(StatusCode, Json<MarkAllReadResponse>), ApiError> {
    let user = get_current_user(&session).await?;
    let updated = mark_all_notifications_read(storage.as_ref(), user.id).await?;

    Ok((StatusCode::OK, Json(MarkAllReadResponse { updated })))
}
