use bigdecimal::BigDecimal;
use std::fmt;

use crate::domain::PageRequest;

pub const USER_ID_MAX_LEN: usize = 64;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_positive(field: &'static str, value: &BigDecimal) -> ValidationResult {
    if value <= &BigDecimal::from(0) {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }

    Ok(())
}

/// Returns the sanitized user id.
pub fn validate_user_id(user_id: &str) -> Result<String, ValidationError> {
    let user_id = sanitize_string(user_id);
    validate_required("userId", &user_id)?;
    validate_max_len("userId", &user_id, USER_ID_MAX_LEN)?;

    Ok(user_id)
}

pub fn validate_page(page_no: Option<i64>, page_size: Option<i64>) -> Result<PageRequest, ValidationError> {
    let defaults = PageRequest::default();

    let page_no = match page_no {
        None => defaults.page_no,
        Some(n) => u32::try_from(n)
            .map_err(|_| ValidationError::new("pageNo", "must be a non-negative integer"))?,
    };

    let page_size = match page_size {
        None => defaults.page_size,
        Some(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n as u32,
        Some(_) => {
            return Err(ValidationError::new(
                "pageSize",
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ))
        }
    };

    Ok(PageRequest::new(page_no, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_string_strips_control_characters() {
        assert_eq!(sanitize_string("  user\u{0007}  42\n"), "user 42");
    }

    #[test]
    fn test_validate_user_id() {
        assert_eq!(validate_user_id("  alice ").unwrap(), "alice");
        assert_eq!(
            validate_user_id("   ").unwrap_err(),
            ValidationError::new("userId", "must not be empty")
        );
        assert!(validate_user_id(&"x".repeat(USER_ID_MAX_LEN + 1)).is_err());
        assert!(validate_user_id(&"x".repeat(USER_ID_MAX_LEN)).is_ok());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("amount", &BigDecimal::from(1)).is_ok());
        assert!(validate_positive("amount", &"0.01".parse().unwrap()).is_ok());
        assert!(validate_positive("amount", &BigDecimal::from(0)).is_err());
        assert!(validate_positive("amount", &BigDecimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_page_defaults() {
        assert_eq!(validate_page(None, None).unwrap(), PageRequest::new(0, 10));
        assert_eq!(validate_page(Some(2), Some(100)).unwrap(), PageRequest::new(2, 100));
    }

    #[test]
    fn test_validate_page_rejects_out_of_range() {
        assert_eq!(validate_page(Some(-1), None).unwrap_err().field, "pageNo");
        assert_eq!(validate_page(None, Some(0)).unwrap_err().field, "pageSize");
        assert_eq!(validate_page(None, Some(101)).unwrap_err().field, "pageSize");
    }
}
