use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use certify_backend::api::build_app;
use certify_backend::cli::{Cli, Commands, execute_command};
use certify_backend::config::{
    BootstrapSettings, MediaSettings, SecretManager, SystemEnvironment, connect_database,
    init_logging, migrate_database,
};
use certify_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;
    let cli = Cli::parse();

    let settings = BootstrapSettings::from_env()?;
    let secret_manager = Arc::new(SecretManager::init()?);
    let media_settings = MediaSettings::from_env_provider(Arc::new(SystemEnvironment))?;

    let db = connect_database(&settings).await?;
    migrate_database(&db).await?;
    tracing::info!("Database ready at {}", settings.database_url());

    let media_store = AppData::media_store_for(media_settings);
    let app_data = Arc::new(AppData::new(db, settings, secret_manager, media_store));

    match cli.command {
        None | Some(Commands::Serve) => serve(app_data).await,
        Some(command) => execute_command(command, app_data).await,
    }
}

async fn serve(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let address = app_data.settings.server_address();
    let api_base_url = app_data.settings.api_base_url();
    let app = build_app(app_data);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("API endpoints available at {}", api_base_url);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
