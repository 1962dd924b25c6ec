use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media uploads are not configured")]
    NotConfigured,

    #[error("Media upload failed: {0}")]
    Upload(String),

    #[error("Media delete failed for {handle}: {message}")]
    Delete { handle: String, message: String },

    #[error("Media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}
