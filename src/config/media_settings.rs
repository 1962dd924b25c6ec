use std::fmt;

use crate::config::config_spec::ConfigSpec;
use crate::config::env_provider::SharedEnvironment;
use crate::config::errors::ApplicationError;

/// Credentials and location of the remote media host
#[derive(Clone)]
pub struct MediaSettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub api_base: String,
}

impl MediaSettings {
    /// Load media settings; `None` when the host credentials are not configured
    ///
    /// A partial configuration (some credentials set, others missing) is an error.
    pub fn from_env_provider(env: SharedEnvironment) -> Result<Option<Self>, ApplicationError> {
        let cloud_name = ConfigSpec::new(env.clone())
            .env_override("MEDIA_CLOUD_NAME")
            .load_optional()?;
        let api_key = ConfigSpec::new(env.clone())
            .env_override("MEDIA_API_KEY")
            .load_optional()?;
        let api_secret = ConfigSpec::new(env.clone())
            .env_override("MEDIA_API_SECRET")
            .load_optional()?;

        let (cloud_name, api_key, api_secret) = match (cloud_name, api_key, api_secret) {
            (None, None, None) => return Ok(None),
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                (cloud_name, api_key, api_secret)
            }
            _ => {
                return Err(ApplicationError::InvalidSetting {
                    setting_name: "MEDIA_CLOUD_NAME/MEDIA_API_KEY/MEDIA_API_SECRET".to_string(),
                    reason: "Media credentials must be set together".to_string(),
                });
            }
        };

        let folder = ConfigSpec::new(env.clone())
            .env_override("MEDIA_FOLDER")
            .default_value("students")
            .load()?
            .value;
        let api_base = ConfigSpec::new(env)
            .env_override("MEDIA_API_BASE")
            .default_value("https://api.cloudinary.com/v1_1")
            .validator(ConfigSpec::validate_http_url)
            .load()?
            .value
            .trim_end_matches('/')
            .to_string();

        Ok(Some(Self {
            cloud_name,
            api_key,
            api_secret,
            folder,
            api_base,
        }))
    }
}

impl fmt::Debug for MediaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSettings")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_unconfigured_media_is_none() {
        let settings = MediaSettings::from_env_provider(MockEnvironment::empty().shared()).unwrap();
        assert!(settings.is_none());
    }

    #[test]
    fn test_full_configuration_with_defaults() {
        let env = MockEnvironment::empty()
            .with_vars(&[
                ("MEDIA_CLOUD_NAME", "demo"),
                ("MEDIA_API_KEY", "1234"),
                ("MEDIA_API_SECRET", "s3cr3t"),
            ])
            .shared();

        let settings = MediaSettings::from_env_provider(env).unwrap().unwrap();
        assert_eq!(settings.folder, "students");
        assert_eq!(settings.api_base, "https://api.cloudinary.com/v1_1");
        assert!(!format!("{:?}", settings).contains("s3cr3t"));
    }

    #[test]
    fn test_partial_configuration_is_rejected() {
        let env = MockEnvironment::empty()
            .with_var("MEDIA_CLOUD_NAME", "demo")
            .shared();
        assert!(MediaSettings::from_env_provider(env).is_err());
    }
}
