use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::SETTINGS_FILE;
use crate::errors::ApiError;
use crate::models::BudgetLimits;
use crate::storage::{SharedStorage, Storage};
use crate::utils::validate_limit_value;

/// Budget limits for a user, defaulted to all-zero on first access. The
/// stored document is the bare limits object.
pub async fn load_limits(storage: &dyn Storage, user_id: i64) -> BudgetLimits {
    match storage.load_object(user_id, SETTINGS_FILE).await {
        Some(value) => match serde_json::from_value(value) {
            Ok(limits) => limits,
            Err(err) => {
                tracing::warn!(user_id, error = %err, "malformed settings document, using defaults");
                BudgetLimits::default()
            }
        },
        None => BudgetLimits::default(),
    }
}

pub async fn get_settings(
    State(storage): State<SharedStorage>,
    session: Session,
) -> Result<(StatusCode, Json<BudgetLimits>), ApiError> {
    let user = get_current_user(&session).await?;
    let limits = load_limits(storage.as_ref(), user.id).await;

    Ok((StatusCode::OK, Json(limits)))
}

/// Full replacement; callers resend all three fields.
pub async fn replace_limits(
    storage: &dyn Storage,
    user_id: i64,
    limits: BudgetLimits,
) -> Result<BudgetLimits, ApiError> {
    let value = serde_json::to_value(limits).map_err(anyhow::Error::from)?;
    if !storage.store_object(user_id, SETTINGS_FILE, &value).await {
        return Err(ApiError::StorageUnavailable {
            user_id,
            resource: SETTINGS_FILE.to_string(),
        });
    }

    Ok(limits)
}

pub async fn update_settings(
    State(storage): State<SharedStorage>,
    session: Session,
    Json(payload): Json<BudgetLimits>,
) -> Result<(StatusCode, Json<BudgetLimits>), ApiError> {
    let user = get_current_user(&session).await?;

    validate_limit_value(payload.daily, "Daily")?;
    validate_limit_value(payload.weekly, "Weekly")?;
    validate_limit_value(payload.monthly, "Monthly")?;

    let limits = replace_limits(storage.as_ref(), user.id, payload).await?;

    Ok((StatusCode::OK, Json(limits)))
}
