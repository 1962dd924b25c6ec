use poem_openapi::Object;

use crate::types::internal::pagination::Page;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Standardized error response model
#[derive(Object, Debug, Clone)]
pub struct ErrorResponse {
    /// Error type or category
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Internal failure detail, development mode only
    #[oai(skip_serializing_if_is_none)]
    pub detail: Option<String>,
}

/// Plain acknowledgement
#[derive(Object, Debug)]
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

/// Pagination block attached to list responses
#[derive(Object, Debug, PartialEq)]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> From<&Page<T>> for PaginationMeta {
    fn from(page: &Page<T>) -> Self {
        Self {
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages(),
        }
    }
}

/// Outcome text for activate/deactivate toggles
pub fn toggle_message(entity: &str, is_active: bool) -> String {
    let state = if is_active { "activated" } else { "deactivated" };
    format!("{} {} successfully", entity, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_message_alternates() {
        assert_eq!(toggle_message("Course", true), "Course activated successfully");
        assert_eq!(toggle_message("Student", false), "Student deactivated successfully");
    }

    #[test]
    fn test_pagination_meta_from_page() {
        let page = Page {
            items: vec![1, 2],
            total: 61,
            page: 2,
            limit: 30,
        };
        assert_eq!(
            PaginationMeta::from(&page),
            PaginationMeta {
                total: 61,
                page: 2,
                limit: 30,
                total_pages: 3,
            }
        );
    }
}
