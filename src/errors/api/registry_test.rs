#[cfg(test)]
mod tests {
    use crate::errors::RegistryApiError;
    use crate::errors::api::ErrorExposure;
    use crate::errors::internal::{DatabaseError, InternalError, MediaError, RegistryError, UniqueField};

    #[test]
    fn test_duplicate_is_bad_request_naming_field() {
        let err = RegistryApiError::from_internal_error(
            RegistryError::duplicate(UniqueField::CourseName, "Food Safety L1").into(),
            ErrorExposure::Redacted,
        );

        assert!(matches!(err, RegistryApiError::BadRequest(_)));
        assert_eq!(err.message(), "Course name already exists");
    }

    #[test]
    fn test_storage_unique_violation_is_conflict() {
        let internal = InternalError::Database(DatabaseError::UniqueViolation {
            operation: "insert_student".to_string(),
            detail: "UNIQUE constraint failed".to_string(),
        });
        let err = RegistryApiError::from_internal_error(internal, ErrorExposure::Redacted);

        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_not_found_variants() {
        let err = RegistryApiError::from_internal_error(
            RegistryError::StudentNotFound.into(),
            ErrorExposure::Redacted,
        );
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Student not found");
    }

    #[test]
    fn test_media_failure_is_internal_and_redacted() {
        let err = RegistryApiError::from_internal_error(
            MediaError::Upload("timeout".to_string()).into(),
            ErrorExposure::Redacted,
        );

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "An internal error occurred");
        assert!(err.detail().is_none());
    }

    #[test]
    fn test_invalid_course_is_bad_request() {
        let err = RegistryApiError::from_internal_error(
            RegistryError::InvalidCourse.into(),
            ErrorExposure::Detailed,
        );

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Invalid course selected");
        assert!(err.detail().is_none());
    }
}
