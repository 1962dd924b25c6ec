// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod health;
pub mod helpers;
pub mod students;

#[cfg(test)]
mod helpers_test;

use std::sync::Arc;

use poem::middleware::{CookieJarManager, Tracing};
use poem::{EndpointExt, Route};
use poem_openapi::OpenApiService;

pub use admin::AdminApi;
pub use auth::{AuthApi, SessionAuth};
pub use courses::CoursesApi;
pub use dashboard::DashboardApi;
pub use health::HealthApi;
pub use students::StudentsApi;

use crate::app_data::AppData;

/// Every endpoint group of the service
pub type ApiSet = (HealthApi, AuthApi, AdminApi, CoursesApi, StudentsApi, DashboardApi);

/// OpenAPI service over every endpoint group
pub fn api_service(app_data: Arc<AppData>) -> OpenApiService<ApiSet, ()> {
    let apis = (
        HealthApi,
        AuthApi::new(app_data.clone()),
        AdminApi::new(app_data.clone()),
        CoursesApi::new(app_data.clone()),
        StudentsApi::new(app_data.clone()),
        DashboardApi::new(app_data.clone()),
    );

    OpenApiService::new(apis, "Certify API", env!("CARGO_PKG_VERSION"))
        .server(app_data.settings.api_base_url())
}

/// Compose routes: the API under `/api` and Swagger UI under `/swagger`
///
/// The cookie jar manager backs the `jwt` cookie security scheme.
pub fn build_app(app_data: Arc<AppData>) -> impl poem::Endpoint {
    let api_service = api_service(app_data);
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(CookieJarManager::new())
        .with(Tracing)
}
