use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::*;
use crate::errors::ApiError;
use crate::expenses::{
    expense_from_payload, load_expenses, next_expense_id, validate_expense_payload,
};
use crate::models::{ExpensePayload, ImportResponse};
use crate::storage::{SharedStorage, Storage, save_records};

/// Export the expense collection as a downloadable JSON document, newest
/// first.
pub async fn export_expenses(
    State(storage): State<SharedStorage>,
    session: Session,
) -> Result<Response, ApiError> {
    let user = get_current_user(&session).await?;

    let mut expenses = load_expenses(storage.as_ref(), user.id).await;
    if expenses.is_empty() {
        return Err(ApiError::NotFound("No expenses to export".to_string()));
    }
    expenses.sort_by(|a, b| b.date.cmp(&a.date));

    let body = serde_json::to_vec_pretty(&expenses).map_err(anyhow::Error::from)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=expenses.json",
            ),
        ],
        body,
    )
        .into_response())
}

/// Append validated rows to the collection, assigning fresh ids past the
/// existing maximum.
pub async fn import_rows(
    storage: &dyn Storage,
    user_id: i64,
    rows: Vec<ExpensePayload>,
) -> Result<usize, ApiError> {
    for (index, row) in rows.iter().enumerate() {
        validate_expense_payload(row).map_err(|err| match err {
            ApiError::BadRequest(msg) => {
                ApiError::BadRequest(format!("Row {}: {}", index + 1, msg))
            }
            other => other,
        })?;
    }

    let mut expenses = load_expenses(storage, user_id).await;
    let mut next_id = next_expense_id(&expenses);
    let imported = rows.len();
    for row in rows {
        expenses.push(expense_from_payload(next_id, row));
        next_id += 1;
    }

    save_records(storage, user_id, EXPENSES_FILE, &expenses).await?;

    Ok(imported)
}

/// Import a JSON array of expense rows. Every row is validated before
/// anything is written.
pub async fn import_expenses(
    State(storage): State<SharedStorage>,
    session: Session,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let user = get_current_user(&session).await?;

    let rows: Vec<ExpensePayload> = serde_json::from_slice(&body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid import document: {}", err)))?;

    if rows.is_empty() {
        return Err(ApiError::BadRequest(
            "Import document contains no rows".to_string(),
        ));
    }
    if rows.len() > MAX_IMPORT_ROWS {
        return Err(ApiError::BadRequest(format!(
            "Import document exceeds {} rows",
            MAX_IMPORT_ROWS
        )));
    }

    let imported = import_rows(storage.as_ref(), user.id, rows).await?;

    Ok((StatusCode::CREATED, Json(ImportResponse { imported })))
}
