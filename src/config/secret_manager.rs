use std::fmt;
use std::sync::Arc;

use crate::config::env_provider::{SharedEnvironment, SystemEnvironment};
use crate::config::{SecretConfig, SecretType};

pub const JWT_SECRET_MIN_LENGTH: usize = 32;
pub const PASSWORD_PEPPER_MIN_LENGTH: usize = 16;

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Holds the session signing secret and the password pepper
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Load secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Load and validate every secret from the given environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn from_env_provider(env: SharedEnvironment) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(&env, &Self::jwt_config())?;
        let password_pepper = Self::load_secret(&env, &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    /// Build from explicit values, applying the same length rules
    pub fn from_values(jwt_secret: &str, password_pepper: &str) -> Result<Self, SecretError> {
        Self::check_length("JWT_SECRET", jwt_secret, JWT_SECRET_MIN_LENGTH)?;
        Self::check_length("PASSWORD_PEPPER", password_pepper, PASSWORD_PEPPER_MIN_LENGTH)?;
        Ok(Self {
            jwt_secret: jwt_secret.to_string(),
            password_pepper: password_pepper.to_string(),
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env_var("JWT_SECRET")
            .required(true)
            .min_length(JWT_SECRET_MIN_LENGTH)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env_var("PASSWORD_PEPPER")
            .required(true)
            .min_length(PASSWORD_PEPPER_MIN_LENGTH)
    }

    /// Get the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    fn check_length(name: &str, value: &str, min_len: usize) -> Result<(), SecretError> {
        if value.len() < min_len {
            return Err(SecretError::invalid_length(name, min_len, value.len()));
        }
        Ok(())
    }

    /// Load a secret based on its configuration
    pub(crate) fn load_secret(
        env: &SharedEnvironment,
        config: &SecretConfig,
    ) -> Result<String, SecretError> {
        let name = config.secret_type.name();
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(SecretError::missing(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            Self::check_length(name, &value, min_len)?;
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const PEPPER: &str = "valid-pepper-16ch";

    fn env(vars: &[(&str, &str)]) -> SharedEnvironment {
        MockEnvironment::empty().with_vars(vars).shared()
    }

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let manager =
            SecretManager::from_env_provider(env(&[("JWT_SECRET", JWT), ("PASSWORD_PEPPER", PEPPER)]))
                .unwrap();

        assert_eq!(manager.jwt_secret(), JWT);
        assert_eq!(manager.password_pepper(), PEPPER);
    }

    #[test]
    fn test_error_when_jwt_secret_missing() {
        let err = SecretManager::from_env_provider(env(&[("PASSWORD_PEPPER", PEPPER)])).unwrap_err();
        match err {
            SecretError::Missing { secret_name } => assert_eq!(secret_name, "JWT_SECRET"),
            _ => panic!("Expected Missing error"),
        }
    }

    #[test]
    fn test_error_when_pepper_too_short() {
        let err = SecretManager::from_env_provider(env(&[
            ("JWT_SECRET", JWT),
            ("PASSWORD_PEPPER", "short"),
        ]))
        .unwrap_err();
        match err {
            SecretError::InvalidLength { secret_name, expected, actual } => {
                assert_eq!(secret_name, "PASSWORD_PEPPER");
                assert_eq!(expected, 16);
                assert_eq!(actual, 5);
            }
            _ => panic!("Expected InvalidLength error"),
        }
    }

    #[test]
    fn test_from_values_applies_length_rules() {
        assert!(SecretManager::from_values("short-secret", PEPPER).is_err());
        assert!(SecretManager::from_values(JWT, PEPPER).is_ok());
    }

    #[test]
    fn test_debug_and_display_do_not_expose_secrets() {
        let manager = SecretManager::from_values(JWT, PEPPER).unwrap();
        let debug_output = format!("{:?}", manager);
        let display_output = format!("{}", manager);

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains(JWT));
        assert!(!debug_output.contains(PEPPER));
        assert!(display_output.contains("secrets_loaded: 2"));
        assert!(!display_output.contains(JWT));
    }

    #[test]
    fn test_optional_secret_may_be_absent() {
        let config = SecretConfig::env_var("OPTIONAL_SECRET").required(false);
        let value = SecretManager::load_secret(&env(&[]), &config).unwrap();
        assert!(value.is_empty());
    }
}
