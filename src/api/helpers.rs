use std::str::FromStr;

use chrono::NaiveDate;
use poem_openapi::types::multipart::Upload;

use crate::errors::InternalError;
use crate::errors::internal::RegistryError;
use crate::providers::MediaUpload;
use crate::types::internal::student::parse_date;

/// Query value with blanks and the `all` sentinel treated as absent
pub fn filter_value(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Parse an enumerated query filter; `all` or blank disables it
pub fn parse_filter<T>(field: &str, raw: Option<String>) -> Result<Option<T>, RegistryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    filter_value(raw)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| RegistryError::invalid_field(field, e.to_string()))
        })
        .transpose()
}

/// `true`/`false` query filter; `all` or blank disables it
pub fn parse_bool_filter(field: &str, raw: Option<String>) -> Result<Option<bool>, RegistryError> {
    match filter_value(raw).as_deref() {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(RegistryError::invalid_field(
            field,
            format!("expected true, false or all, got {:?}", other),
        )),
    }
}

pub fn parse_date_filter(field: &str, raw: Option<String>) -> Result<Option<NaiveDate>, RegistryError> {
    filter_value(raw).map(|v| parse_date(field, &v)).transpose()
}

/// A client upload that could not be read is a bad request, not a server failure
pub fn unreadable_upload(err: std::io::Error) -> InternalError {
    RegistryError::invalid_field("image", format!("Failed to read upload: {}", err)).into()
}

/// Read an optional multipart upload; an empty part counts as no file
pub async fn read_upload(upload: Option<Upload>) -> Result<Option<MediaUpload>, InternalError> {
    let Some(upload) = upload else {
        return Ok(None);
    };

    let filename = upload.file_name().unwrap_or("upload").to_string();
    let content_type = upload.content_type().map(str::to_string);
    let bytes = upload
        .into_vec()
        .await
        .map_err(unreadable_upload)?;

    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(MediaUpload {
        bytes,
        filename,
        content_type,
    }))
}
