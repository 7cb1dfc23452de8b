//! Field validation for the two request contexts.
//!
//! Read requests (list/agenda) check only the FIRST present field among
//! status, priority, category, date; a later field shadowed by an earlier
//! valid one is accepted as-is and simply filters nothing. Body requests
//! check every present field, in the order status, priority, category,
//! due date.
use chrono::NaiveDate;
use todo_core::{parse_due_date, Category, Priority, Status};

use crate::error::AppError;

pub fn validate_read_query(
    status: Option<&str>,
    priority: Option<&str>,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<(), AppError> {
    if let Some(status) = status {
        if Status::parse(status).is_none() {
            return Err(AppError::InvalidStatus);
        }
    } else if let Some(priority) = priority {
        if Priority::parse(priority).is_none() {
            return Err(AppError::InvalidPriority);
        }
    } else if let Some(category) = category {
        if Category::parse(category).is_none() {
            return Err(AppError::InvalidCategory);
        }
    } else if let Some(date) = date {
        if parse_due_date(date).is_none() {
            return Err(AppError::InvalidDueDate);
        }
    }
    Ok(())
}

pub fn parse_status(value: &str) -> Result<Status, AppError> {
    Status::parse(value).ok_or(AppError::InvalidStatus)
}

pub fn parse_priority(value: &str) -> Result<Priority, AppError> {
    Priority::parse(value).ok_or(AppError::InvalidPriority)
}

pub fn parse_category(value: &str) -> Result<Category, AppError> {
    Category::parse(value).ok_or(AppError::InvalidCategory)
}

pub fn parse_due_date_value(value: &str) -> Result<NaiveDate, AppError> {
    parse_due_date(value).ok_or(AppError::InvalidDueDate)
}

pub fn parse_status_field(value: Option<&str>) -> Result<Option<Status>, AppError> {
    value.map(parse_status).transpose()
}

pub fn parse_priority_field(value: Option<&str>) -> Result<Option<Priority>, AppError> {
    value.map(parse_priority).transpose()
}

pub fn parse_category_field(value: Option<&str>) -> Result<Option<Category>, AppError> {
    value.map(parse_category).transpose()
}

pub fn parse_due_date_field(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value.map(parse_due_date_value).transpose()
}
