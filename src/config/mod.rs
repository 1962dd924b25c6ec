mod bootstrap_settings;
mod config_spec;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod media_settings;
mod secret_config;
mod secret_manager;

pub use bootstrap_settings::{AppEnvironment, BootstrapSettings};
pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use database::{connect_database, migrate_database};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SharedEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use media_settings::MediaSettings;
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
