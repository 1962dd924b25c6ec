// Account bootstrap commands

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, UserCoordinator};
use crate::types::db::Role;
use crate::types::internal::context::RequestContext;

/// Create an admin account directly, bypassing HTTP registration
pub async fn create_admin(
    app_data: Arc<AppData>,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create_admin");
    let coordinator = AuthCoordinator::new(app_data);

    match coordinator
        .create_account(&ctx, Some(username), Some(email), Some(password), Role::Admin)
        .await
    {
        Ok(user) => {
            println!("✅ Admin account created");
            println!("   Username: {}", user.username);
            println!("   Email:    {}", user.email);
            println!("   ID:       {}", user.id);
            Ok(())
        }
        Err(e) => {
            println!("❌ Error: {}", e);
            Err(e.into())
        }
    }
}

/// Give an existing account the admin role
pub async fn promote(app_data: Arc<AppData>, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("promote");
    let coordinator = UserCoordinator::new(app_data);

    match coordinator.promote_by_email(&ctx, email).await {
        Ok(user) => {
            println!("✅ {} ({}) is now an admin", user.username, user.email);
            Ok(())
        }
        Err(e) => {
            println!("❌ Error: {}", e);
            Err(e.into())
        }
    }
}
