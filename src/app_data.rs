use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{BootstrapSettings, MediaSettings, SecretManager};
use crate::errors::api::ErrorExposure;
use crate::providers::{
    AccessGate, CloudinaryMediaStore, DisabledMediaStore, MediaStore, TokenProvider,
};
use crate::stores::{CourseStore, CredentialStore, StudentStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once in main.rs from explicit configuration and shared
/// across coordinators; nothing lives in module-level globals.
///
/// ```text
/// main.rs
///   ↓
/// AppData::new(db, settings, secrets, media)
///   ├─ credential_store / course_store / student_store
///   ├─ token_provider
///   ├─ access_gate (token_provider + credential_store)
///   └─ media_store (Cloudinary or disabled)
///   ↓ wrapped in Arc<AppData>
///   └─ *Coordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: BootstrapSettings,
    pub error_exposure: ErrorExposure,
    pub secret_manager: Arc<SecretManager>,
    pub credential_store: Arc<CredentialStore>,
    pub course_store: Arc<CourseStore>,
    pub student_store: Arc<StudentStore>,
    pub token_provider: Arc<TokenProvider>,
    pub access_gate: Arc<AccessGate>,
    pub media_store: Arc<dyn MediaStore>,
}

impl AppData {
    pub fn new(
        db: DatabaseConnection,
        settings: BootstrapSettings,
        secret_manager: Arc<SecretManager>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            secret_manager.password_pepper().to_string(),
        ));
        let course_store = Arc::new(CourseStore::new(db.clone()));
        let student_store = Arc::new(StudentStore::new(db.clone()));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));
        let access_gate = Arc::new(AccessGate::new(
            token_provider.clone(),
            credential_store.clone(),
        ));

        tracing::info!("Application data initialized ({:?})", settings.app_env());

        Self {
            error_exposure: settings.app_env().error_exposure(),
            db,
            settings,
            secret_manager,
            credential_store,
            course_store,
            student_store,
            token_provider,
            access_gate,
            media_store,
        }
    }

    /// Media store for the given settings; uploads are disabled when none are configured
    pub fn media_store_for(settings: Option<MediaSettings>) -> Arc<dyn MediaStore> {
        match settings {
            Some(settings) => {
                tracing::info!("Media uploads enabled for cloud {}", settings.cloud_name);
                Arc::new(CloudinaryMediaStore::new(settings))
            }
            None => {
                tracing::warn!("Media settings not configured; image uploads are disabled");
                Arc::new(DisabledMediaStore)
            }
        }
    }
}
