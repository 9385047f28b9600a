/// API route handlers, organized by resource
///
/// - `health`: Health check
/// - `auth`: Registration and login
/// - `users`: Authenticated user's profile details
/// - `cities`: City reference data
/// - `products`: Catalog listing and lookup
/// - `orders`: Cart and order workflow

pub mod auth;
pub mod cities;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Body returned by endpoints that only confirm an action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parses a numeric path segment
///
/// IDs that cannot name a row (non-numeric, out of range) are reported as
/// `not_found` so every lookup fails the same way.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// Normalizes an optional text field: trims it and treats blank as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "Product not found").unwrap(), 42);
        assert!(matches!(
            parse_id("abc", "Product not found"),
            Err(ApiError::NotFound(ref m)) if m == "Product not found"
        ));
        assert!(parse_id("99999999999", "Order not found").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" L ".to_string())), Some("L".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
