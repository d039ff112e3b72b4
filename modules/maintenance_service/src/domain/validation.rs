//! Input validation for lookup rows, items, jobs and notes

use crate::contract::{MaintenanceError, ReportPeriod};
use chrono::NaiveDate;

/// Trim a description and check it is present and not too long
///
/// `field` names the input in the error message ("Description", "Part number").
pub fn normalize_text(field: &str, value: &str, max_len: usize) -> Result<String, MaintenanceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MaintenanceError::validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(MaintenanceError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text; blank becomes `None`
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Key used for the case-insensitive uniqueness checks
pub fn unique_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Validate an equipment serial number
///
/// Serial numbers are printed on plates and typed in by hand: letters,
/// digits, `-`, `/` and `.` only, no spaces.
pub fn validate_serial_no(serial_no: &str) -> Result<String, MaintenanceError> {
    let serial = normalize_text("Serial number", serial_no, 50)?;
    let valid = serial
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '/' | '.'));
    if !valid {
        return Err(MaintenanceError::validation(format!(
            "Serial number '{}' may only contain letters, digits, '-', '/' and '.'",
            serial
        )));
    }
    Ok(serial)
}

/// Minimal email shape check: `local@domain.tld`
pub fn validate_email(email: &str) -> Result<String, MaintenanceError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(MaintenanceError::validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email)
}

pub fn validate_quantity(quantity: i32) -> Result<(), MaintenanceError> {
    if quantity <= 0 {
        return Err(MaintenanceError::validation(format!(
            "Quantity must be greater than zero (got {})",
            quantity
        )));
    }
    Ok(())
}

pub fn validate_period(period: &ReportPeriod) -> Result<(), MaintenanceError> {
    if period.start > period.end {
        return Err(MaintenanceError::validation(format!(
            "Start date {} is after end date {}",
            period.start, period.end
        )));
    }
    Ok(())
}

pub fn validate_job_date(
    job_date: NaiveDate,
    today: NaiveDate,
    reject_future: bool,
) -> Result<(), MaintenanceError> {
    if reject_future && job_date > today {
        return Err(MaintenanceError::validation(format!(
            "Job date {} is in the future",
            job_date
        )));
    }
    Ok(())
}
