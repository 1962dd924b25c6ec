use poem_openapi::Object;

use super::auth::UserSummary;

/// Response model for the user listing
#[derive(Object, Debug)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
    pub count: u64,
}

/// Outcome of a user-management action
#[derive(Object, Debug)]
pub struct UserActionResponse {
    pub message: String,
    pub user: UserSummary,
}
