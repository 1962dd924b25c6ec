#[cfg(test)]
mod tests {
    use crate::api::helpers::*;
    use crate::errors::api::ErrorExposure;
    use crate::errors::internal::RegistryError;
    use crate::errors::{InternalError, RegistryApiError};
    use crate::types::db::{Competency, StudentStatus};
    use chrono::NaiveDate;

    #[test]
    fn test_all_and_blank_disable_filters() {
        assert_eq!(filter_value(Some("all".into())), None);
        assert_eq!(filter_value(Some("ALL".into())), None);
        assert_eq!(filter_value(Some("  ".into())), None);
        assert_eq!(filter_value(Some(" B-01 ".into())), Some("B-01".to_string()));
    }

    #[test]
    fn test_enum_filters() {
        let status: Option<StudentStatus> = parse_filter("status", Some("on_leave".into())).unwrap();
        assert_eq!(status, Some(StudentStatus::OnLeave));

        let competency: Option<Competency> = parse_filter("competency", Some("all".into())).unwrap();
        assert_eq!(competency, None);

        let bad: Result<Option<StudentStatus>, _> = parse_filter("status", Some("graduated".into()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_bool_filter() {
        assert_eq!(parse_bool_filter("is_active", Some("true".into())).unwrap(), Some(true));
        assert_eq!(parse_bool_filter("is_active", Some("false".into())).unwrap(), Some(false));
        assert_eq!(parse_bool_filter("is_active", None).unwrap(), None);
        assert!(parse_bool_filter("is_active", Some("yes".into())).is_err());
    }

    #[test]
    fn test_date_filter() {
        assert_eq!(
            parse_date_filter("date_from", Some("2024-02-01".into())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert!(parse_date_filter("date_from", Some("01/02/2024".into())).is_err());
    }

    #[test]
    fn test_unreadable_upload_is_client_error() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "multipart stream ended early");
        let err = unreadable_upload(io);

        match &err {
            InternalError::Registry(RegistryError::InvalidField { field, .. }) => {
                assert_eq!(field, "image")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let api = RegistryApiError::from_internal_error(err, ErrorExposure::Redacted);
        assert_eq!(api.status_code(), 400);
    }
}
