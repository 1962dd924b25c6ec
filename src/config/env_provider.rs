use std::collections::HashMap;
use std::sync::Arc;

/// Source of environment variables
///
/// Settings are read through this trait so tests can supply values without
/// touching the process environment, which parallel tests share.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;

    /// Like `get_var`, but a blank value counts as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_var(key).filter(|value| !value.trim().is_empty())
    }
}

pub type SharedEnvironment = Arc<dyn EnvironmentProvider + Send + Sync>;

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, for tests and for embedding the service
#[derive(Debug, Clone, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn shared(self) -> SharedEnvironment {
        Arc::new(self)
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_provider() {
        let provider = SystemEnvironment;

        unsafe {
            std::env::set_var("CERTIFY_TEST_VAR_12345", "test_value");
        }

        assert_eq!(
            provider.get_var("CERTIFY_TEST_VAR_12345"),
            Some("test_value".to_string())
        );
        assert_eq!(provider.get_var("CERTIFY_NON_EXISTENT_98765"), None);

        unsafe {
            std::env::remove_var("CERTIFY_TEST_VAR_12345");
        }
    }

    #[test]
    fn test_mock_environment_with_vars() {
        let provider = MockEnvironment::empty().with_vars(&[
            ("MEDIA_CLOUD_NAME", "demo"),
            ("MEDIA_FOLDER", "students"),
        ]);

        assert_eq!(provider.get_var("MEDIA_CLOUD_NAME"), Some("demo".to_string()));
        assert_eq!(provider.get_var("MEDIA_FOLDER"), Some("students".to_string()));
        assert_eq!(provider.get_var("MEDIA_API_KEY"), None);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let provider = MockEnvironment::empty().with_var("PUBLIC_BASE_URL", "   ");

        assert_eq!(provider.get_var("PUBLIC_BASE_URL"), Some("   ".to_string()));
        assert_eq!(provider.get_non_empty("PUBLIC_BASE_URL"), None);
    }
}
