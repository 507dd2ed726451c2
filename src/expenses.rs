use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use time::{Date, Duration};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::*;
use crate::errors::ApiError;
use crate::limits::{RollingTotals, check_limits};
use crate::models::{CreateExpenseResponse, Expense, ExpensePayload, LimitAlert};
use crate::storage::{SharedStorage, Storage, load_records, save_records};
use crate::utils::{today_utc, validate_amount, validate_string_length};

pub async fn load_expenses(storage: &dyn Storage, user_id: i64) -> Vec<Expense> {
    load_records(storage, user_id, EXPENSES_FILE).await
}

/// Next expense id: one past the current maximum. Ids are never reused, even
/// after deletions.
pub fn next_expense_id(expenses: &[Expense]) -> i64 {
    expenses.iter().map(|e| e.id).max().unwrap_or(0) + 1
}

/// First day (Monday) of the ISO week containing `date`.
pub fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Sum the day, week-to-date and month-to-date windows ending `today`.
/// Future-dated expenses fall outside every window.
pub fn rolling_totals(expenses: &[Expense], today: Date) -> RollingTotals {
    let monday = week_start(today);
    let mut totals = RollingTotals::default();

    for expense in expenses {
        if expense.date > today {
            continue;
        }
        if expense.date == today {
            totals.today += expense.amount;
        }
        if expense.date >= monday {
            totals.week += expense.amount;
        }
        if expense.date.year() == today.year() && expense.date.month() == today.month() {
            totals.month += expense.amount;
        }
    }

    totals
}

pub fn validate_expense_payload(payload: &ExpensePayload) -> Result<(), ApiError> {
    validate_amount(payload.amount)?;
    validate_string_length(&payload.description, "Description", MAX_DESCRIPTION_LENGTH)?;
    if let Some(category) = &payload.category {
        validate_string_length(category, "Category", MAX_CATEGORY_NAME_LENGTH)?;
    }
    Ok(())
}

pub(crate) fn expense_from_payload(id: i64, payload: ExpensePayload) -> Expense {
    Expense {
        id,
        amount: payload.amount,
        description: payload.description.trim().to_string(),
        date: payload.date,
        category: payload.category.map(|c| c.trim().to_string()),
    }
}

/// Assign the next id, rewrite the collection including the new expense,
/// then evaluate limits over the updated rolling totals.
pub async fn add_expense(
    storage: &dyn Storage,
    user_id: i64,
    payload: ExpensePayload,
) -> Result<(Expense, Vec<LimitAlert>), ApiError> {
    let mut expenses = load_expenses(storage, user_id).await;
    let expense = expense_from_payload(next_expense_id(&expenses), payload);
    expenses.push(expense.clone());
    save_records(storage, user_id, EXPENSES_FILE, &expenses).await?;

    let today = today_utc();
    let totals = rolling_totals(&expenses, today);
    let details = check_limits(storage, user_id, totals, today).await;

    Ok((expense, details))
}

/// Replace the expense in place, preserving its position; the id is
/// immutable.
pub async fn modify_expense(
    storage: &dyn Storage,
    user_id: i64,
    expense_id: i64,
    payload: ExpensePayload,
) -> Result<Expense, ApiError> {
    let mut expenses = load_expenses(storage, user_id).await;
    let Some(slot) = expenses.iter_mut().find(|e| e.id == expense_id) else {
        return Err(ApiError::NotFound(ERR_EXPENSE_NOT_FOUND.to_string()));
    };

    *slot = expense_from_payload(expense_id, payload);
    let updated = slot.clone();
    save_records(storage, user_id, EXPENSES_FILE, &expenses).await?;

    Ok(updated)
}

pub async fn remove_expense(
    storage: &dyn Storage,
    user_id: i64,
    expense_id: i64,
) -> Result<(), ApiError> {
    let mut expenses = load_expenses(storage, user_id).await;
    let before = expenses.len();
    expenses.retain(|e| e.id != expense_id);
    if expenses.len() == before {
        return Err(ApiError::NotFound(ERR_EXPENSE_NOT_FOUND.to_string()));
    }

    save_records(storage, user_id, EXPENSES_FILE, &expenses).await
}

pub async fn list_expenses(
    State(storage): State<SharedStorage>,
    session: Session,
) -> Result<(StatusCode, Json<Vec<Expense>>), ApiError> {
    let user = get_current_user(&session).await?;
    let expenses = load_expenses(storage.as_ref(), user.id).await;

    Ok((StatusCode::OK, Json(expenses)))
}

/// The response always carries the full per-period breakdown, even when a
/// period's notification was suppressed as a duplicate.
pub async fn create_expense(
    State(storage): State<SharedStorage>,
    session: Session,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<CreateExpenseResponse>), ApiError> {
    let user = get_current_user(&session).await?;
    validate_expense_payload(&payload)?;

    let (expense, details) = add_expense(storage.as_ref(), user.id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateExpenseResponse {
            expense,
            limit_exceeded: !details.is_empty(),
            details,
        }),
    ))
}

pub async fn update_expense(
    State(storage): State<SharedStorage>,
    session: Session,
    Path(expense_id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let user = get_current_user(&session).await?;
    validate_expense_payload(&payload)?;

    let updated = modify_expense(storage.as_ref(), user.id, expense_id, payload).await?;

    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete_expense(
    State(storage): State<SharedStorage>,
    session: Session,
    Path(expense_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user = get_current_user(&session).await?;

    remove_expense(storage.as_ref(), user.id, expense_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
