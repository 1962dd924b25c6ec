use std::sync::Arc;

use certify_backend::AppData;
use certify_backend::config::{
    AppEnvironment, BootstrapSettings, MediaSettings, MockEnvironment, SecretError, SecretManager,
    connect_database, migrate_database,
};
use certify_backend::errors::api::ErrorExposure;

fn full_environment() -> MockEnvironment {
    MockEnvironment::empty().with_vars(&[
        ("DATABASE_URL", "sqlite::memory:"),
        ("PORT", "8080"),
        ("APP_ENV", "development"),
        ("PUBLIC_BASE_URL", "https://certify.example.com/"),
        ("JWT_SECRET", "this-is-a-valid-jwt-secret-with-32-characters"),
        ("PASSWORD_PEPPER", "valid-pepper-16ch"),
    ])
}

#[tokio::test]
async fn test_application_starts_from_environment() {
    let env = full_environment().shared();

    let settings = BootstrapSettings::from_env_provider(env.clone()).unwrap();
    assert_eq!(settings.server_address(), "0.0.0.0:8080");
    assert_eq!(settings.api_base_url(), "https://certify.example.com/api");
    assert_eq!(settings.app_env(), AppEnvironment::Development);

    let secrets = Arc::new(SecretManager::from_env_provider(env.clone()).unwrap());
    let media = MediaSettings::from_env_provider(env).unwrap();
    assert!(media.is_none(), "media uploads stay disabled without credentials");

    let db = connect_database(&settings).await.unwrap();
    migrate_database(&db).await.unwrap();

    let app_data = AppData::new(db, settings, secrets, AppData::media_store_for(media));
    assert_eq!(app_data.error_exposure, ErrorExposure::Detailed);
    assert_eq!(app_data.credential_store.count_users().await.unwrap(), 0);
}

#[test]
fn test_startup_fails_without_jwt_secret() {
    let env = MockEnvironment::empty()
        .with_var("PASSWORD_PEPPER", "valid-pepper-16ch")
        .shared();

    match SecretManager::from_env_provider(env) {
        Err(SecretError::Missing { secret_name }) => assert_eq!(secret_name, "JWT_SECRET"),
        other => panic!("expected missing JWT_SECRET, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_startup_fails_with_short_pepper() {
    let env = full_environment().with_var("PASSWORD_PEPPER", "short").shared();

    match SecretManager::from_env_provider(env) {
        Err(SecretError::InvalidLength { secret_name, expected, .. }) => {
            assert_eq!(secret_name, "PASSWORD_PEPPER");
            assert_eq!(expected, 16);
        }
        other => panic!("expected short pepper error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_partial_media_credentials_are_rejected() {
    let env = full_environment()
        .with_var("MEDIA_CLOUD_NAME", "demo")
        .shared();
    assert!(MediaSettings::from_env_provider(env).is_err());

    let env = full_environment()
        .with_vars(&[
            ("MEDIA_CLOUD_NAME", "demo"),
            ("MEDIA_API_KEY", "key"),
            ("MEDIA_API_SECRET", "secret"),
        ])
        .shared();
    let media = MediaSettings::from_env_provider(env).unwrap().unwrap();
    assert_eq!(media.folder, "students");
    assert!(!format!("{:?}", media).contains("\"secret\""));
}

#[test]
fn test_production_is_the_default_environment() {
    let settings = BootstrapSettings::from_env_provider(MockEnvironment::empty().shared()).unwrap();
    assert_eq!(settings.app_env(), AppEnvironment::Production);
    assert_eq!(settings.app_env().error_exposure(), ErrorExposure::Redacted);
    assert_eq!(settings.database_url(), "sqlite://certify.db?mode=rwc");
}
