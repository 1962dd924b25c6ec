// Internal types - not exposed through the API
pub mod auth;
pub mod context;
pub mod course;
pub mod dashboard;
pub mod pagination;
pub mod student;
pub mod update_mask;

pub use context::{RequestContext, RequestId, RequestSource};
pub use update_mask::Patch;
