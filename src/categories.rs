use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::*;
use crate::errors::ApiError;
use crate::models::{CategoryPayload, RenameCategoryPayload};
use crate::storage::{SharedStorage, Storage, load_records, save_records};
use crate::utils::validate_string_length;

pub fn validate_category_name(name: &str) -> Result<(), ApiError> {
    validate_string_length(name, "Category name", MAX_CATEGORY_NAME_LENGTH)
}

pub async fn load_categories(storage: &dyn Storage, user_id: i64) -> Vec<String> {
    load_records(storage, user_id, CATEGORIES_FILE).await
}

fn category_exists(categories: &[String], name: &str) -> bool {
    categories.iter().any(|c| c.eq_ignore_ascii_case(name))
}

/// The user's categories, seeding the built-in defaults on first access.
pub async fn ensure_categories(
    storage: &dyn Storage,
    user_id: i64,
) -> Result<Vec<String>, ApiError> {
    let categories = load_categories(storage, user_id).await;
    if !categories.is_empty() {
        return Ok(categories);
    }

    let defaults: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    save_records(storage, user_id, CATEGORIES_FILE, &defaults).await?;
    Ok(defaults)
}

pub async fn add_category(
    storage: &dyn Storage,
    user_id: i64,
    name: &str,
) -> Result<Vec<String>, ApiError> {
    let name = name.trim().to_string();

    let mut categories = load_categories(storage, user_id).await;
    if category_exists(&categories, &name) {
        return Err(ApiError::Conflict("Category already exists".to_string()));
    }

    categories.push(name);
    save_records(storage, user_id, CATEGORIES_FILE, &categories).await?;
    Ok(categories)
}

pub async fn remove_category(
    storage: &dyn Storage,
    user_id: i64,
    name: &str,
) -> Result<Vec<String>, ApiError> {
    let mut categories = load_categories(storage, user_id).await;
    let before = categories.len();
    categories.retain(|c| c != name);
    if categories.len() == before {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    save_records(storage, user_id, CATEGORIES_FILE, &categories).await?;
    Ok(categories)
}

/// Rename in place, preserving the category's position in the list.
pub async fn rename_category_in_place(
    storage: &dyn Storage,
    user_id: i64,
    old_name: &str,
    new_name: &str,
) -> Result<Vec<String>, ApiError> {
    let new_name = new_name.trim().to_string();

    let mut categories = load_categories(storage, user_id).await;
    let Some(index) = categories.iter().position(|c| c == old_name) else {
        return Err(ApiError::NotFound(
            "Original category not found".to_string(),
        ));
    };
    if category_exists(&categories, &new_name) {
        return Err(ApiError::Conflict(
            "New category name already exists".to_string(),
        ));
    }

    categories[index] = new_name;
    save_records(storage, user_id, CATEGORIES_FILE, &categories).await?;
    Ok(categories)
}

pub async fn list_categories(
    State(storage): State<SharedStorage>,
    session: Session,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let user = get_current_user(&session).await?;
    let categories = ensure_categories(storage.as_ref(), user.id).await?;

    Ok((StatusCode::OK, Json(categories)))
}

pub async fn create_category(
    State(storage): State<SharedStorage>,
    session: Session,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let user = get_current_user(&session).await?;
    validate_category_name(&payload.name)?;

    let categories = add_category(storage.as_ref(), user.id, &payload.name).await?;

    Ok((StatusCode::CREATED, Json(categories)))
}

pub async fn delete_category(
    State(storage): State<SharedStorage>,
    session: Session,
    Json(payload): Json<CategoryPayload>,
) -> Result<StatusCode, ApiError> {
    let user = get_current_user(&session).await?;

    remove_category(storage.as_ref(), user.id, &payload.name).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn rename_category(
    State(storage): State<SharedStorage>,
    session: Session,
    Json(payload): Json<RenameCategoryPayload>,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError> {
    let user = get_current_user(&session).await?;
    validate_category_name(&payload.new_name)?;

    let categories = rename_category_in_place(
        storage.as_ref(),
        user.id,
        &payload.old_name,
        &payload.new_name,
    )
    .await?;

    Ok((StatusCode::OK, Json(categories)))
}
