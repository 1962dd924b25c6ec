use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::env_provider::{SharedEnvironment, SystemEnvironment};
use crate::config::errors::ApplicationError;
use crate::errors::api::ErrorExposure;

/// Deployment mode, decides whether internal error detail reaches clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Result<Self, ApplicationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ApplicationError::ParseError {
                setting_name: "APP_ENV".to_string(),
                error: format!("Expected 'development' or 'production', got '{}'", other),
            }),
        }
    }

    pub fn error_exposure(&self) -> ErrorExposure {
        match self {
            Self::Development => ErrorExposure::Detailed,
            Self::Production => ErrorExposure::Redacted,
        }
    }
}

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    app_env: AppEnvironment,
    public_base_url: Option<String>,
}

impl BootstrapSettings {
    /// Load bootstrap settings through ConfigSpec from the given environment
    pub fn from_env_provider(env: SharedEnvironment) -> Result<Self, ApplicationError> {
        let database_url = ConfigSpec::new(env.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://certify.db?mode=rwc")
            .min_length(1)
            .load()?
            .value;

        let server_host = ConfigSpec::new(env.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load()?
            .value;

        let port_value = ConfigSpec::new(env.clone())
            .env_override("PORT")
            .default_value("3030")
            .validator(|value| ConfigSpec::validate_port_range(value, 1, 65535))
            .load()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let app_env = ConfigSpec::new(env.clone())
            .env_override("APP_ENV")
            .default_value("production")
            .load()?
            .value;
        let app_env = AppEnvironment::parse(&app_env)?;

        let public_base_url = ConfigSpec::new(env)
            .env_override("PUBLIC_BASE_URL")
            .validator(ConfigSpec::validate_http_url)
            .load_optional()?
            .map(|url| url.trim_end_matches('/').to_string());

        Ok(Self {
            database_url,
            server_host,
            server_port,
            app_env,
            public_base_url,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn app_env(&self) -> AppEnvironment {
        self.app_env
    }

    /// URL advertised as the API server in the OpenAPI document
    pub fn api_base_url(&self) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/api", base),
            None => format!("http://localhost:{}/api", self.server_port),
        }
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_env", &self.app_env)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}
