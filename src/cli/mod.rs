// CLI module for administrative operations requiring server access

pub mod accounts;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Certify CLI; serves the HTTP API when no subcommand is given
#[derive(Parser, Debug)]
#[command(name = "certify-backend")]
#[command(about = "Student certification admin back-end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create an admin account
    ///
    /// Registration over HTTP always yields role `user`; this is the bootstrap path.
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Grant the admin role to an existing account
    Promote {
        #[arg(long)]
        email: String,
    },
}

/// Execute CLI command
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    command: Commands,
    app_data: Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => Err("serve is handled by main".into()),
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => accounts::create_admin(app_data, &username, &email, &password).await,
        Commands::Promote { email } => accounts::promote(app_data, &email).await,
    }
}
