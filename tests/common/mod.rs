// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use certify_backend::AppData;
use certify_backend::config::{
    BootstrapSettings, MockEnvironment, SecretManager, connect_database, migrate_database,
};
use certify_backend::coordinators::{AuthCoordinator, CourseCoordinator};
use certify_backend::errors::internal::MediaError;
use certify_backend::providers::{MediaAsset, MediaStore, MediaUpload};
use certify_backend::types::db::{DurationUnit, Role, course, user};
use certify_backend::types::internal::auth::AuthenticatedUser;
use certify_backend::types::internal::context::RequestContext;
use certify_backend::types::internal::course::{CourseDuration, NewCourse};
use certify_backend::types::internal::student::StudentForm;

pub const TEST_JWT_SECRET: &str = "integration-test-jwt-secret-0123456789abcdef";
pub const TEST_PASSWORD_PEPPER: &str = "integration-test-pepper";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Media host fake that records every call and can be told to fail
#[derive(Default)]
pub struct RecordingMediaStore {
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl RecordingMediaStore {
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<MediaAsset, MediaError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Upload("simulated upload failure".to_string()));
        }

        let mut uploads = self.uploads.lock().unwrap();
        let handle = format!("students/{}-{}", uploads.len() + 1, upload.filename);
        uploads.push(handle.clone());
        Ok(MediaAsset {
            url: format!("https://media.test/{}", handle),
            handle,
        })
    }

    async fn delete(&self, handle: &str) -> Result<(), MediaError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaError::Delete {
                handle: handle.to_string(),
                message: "simulated delete failure".to_string(),
            });
        }
        self.deletes.lock().unwrap().push(handle.to_string());
        Ok(())
    }
}

/// A fully wired application over an in-memory database
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub media: Arc<RecordingMediaStore>,
    pub admin: user::Model,
}

impl TestApp {
    pub async fn new() -> Self {
        let env = MockEnvironment::empty()
            .with_vars(&[("DATABASE_URL", "sqlite::memory:"), ("APP_ENV", "development")])
            .shared();
        let settings = BootstrapSettings::from_env_provider(env).expect("Failed to load settings");

        let db = connect_database(&settings)
            .await
            .expect("Failed to create test database");
        migrate_database(&db).await.expect("Failed to run migrations");

        let secret_manager = Arc::new(
            SecretManager::from_values(TEST_JWT_SECRET, TEST_PASSWORD_PEPPER)
                .expect("Test secrets should be valid"),
        );
        let media = Arc::new(RecordingMediaStore::default());
        let app_data = Arc::new(AppData::new(db, settings, secret_manager, media.clone()));

        let admin = AuthCoordinator::new(app_data.clone())
            .create_account(
                &RequestContext::for_cli("test_setup"),
                Some("admin"),
                Some("admin@example.com"),
                Some(ADMIN_PASSWORD),
                Role::Admin,
            )
            .await
            .expect("Failed to seed admin");

        Self {
            app_data,
            media,
            admin,
        }
    }

    /// Request context as seen after the access gate admitted the seeded admin
    pub fn admin_ctx(&self) -> RequestContext {
        RequestContext::for_cli("test").with_user(AuthenticatedUser::from(&self.admin))
    }

    pub fn admin_token(&self) -> String {
        self.app_data
            .token_provider
            .issue(&self.admin.id)
            .expect("Failed to issue token")
            .token
    }

    pub async fn create_course(&self, name: &str, code: &str, months: f64) -> course::Model {
        CourseCoordinator::new(self.app_data.clone())
            .create(
                &self.admin_ctx(),
                NewCourse {
                    course_name: name.to_string(),
                    course_code: code.to_string(),
                    duration: CourseDuration {
                        value: months,
                        unit: DurationUnit::Months,
                    },
                    description: String::new(),
                    additional_info: vec![],
                    is_active: true,
                },
            )
            .await
            .expect("Failed to create course")
    }
}

/// A complete create form for `course_id`
pub fn student_form(student_id: &str, registration_number: &str, course_id: &str) -> StudentForm {
    StudentForm {
        student_name: Some("Amina Rahman".into()),
        fathers_name: Some("Karim Rahman".into()),
        student_id: Some(student_id.into()),
        registration_number: Some(registration_number.into()),
        course: Some(course_id.into()),
        competency: Some("competent".into()),
        batch: Some("2025-A".into()),
        status: Some("active".into()),
        issue_date: Some("2025-01-15".into()),
        ..Default::default()
    }
}

pub fn photo(name: &str) -> MediaUpload {
    MediaUpload {
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        filename: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
    }
}
