use time::Date;

use crate::errors::ApiError;

pub fn validate_string_length(
    value: &str,
    field_name: &str,
    max_length: usize,
) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "{} cannot be empty",
            field_name
        )));
    }
    if value.len() > max_length {
        return Err(ApiError::BadRequest(format!(
            "{} must be less than {} characters",
            field_name, max_length
        )));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::BadRequest(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_limit_value(value: f64, field_name: &str) -> Result<(), ApiError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::BadRequest(format!(
            "{} limit cannot be negative",
            field_name
        )));
    }
    Ok(())
}

pub fn today_utc() -> Date {
    time::OffsetDateTime::now_utc().date()
}
