use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::app_data::AppData;
use crate::coordinators::DashboardCoordinator;
use crate::errors::RegistryApiError;
use crate::errors::api::ErrorExposure;
use crate::providers::{AccessGate, Requirement};
use crate::types::dto::dashboard::DashboardResponse;

use super::auth::SessionAuth;

/// Admin dashboard endpoints
pub struct DashboardApi {
    dashboard_coordinator: Arc<DashboardCoordinator>,
    access_gate: Arc<AccessGate>,
    error_exposure: ErrorExposure,
}

impl DashboardApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            access_gate: app_data.access_gate.clone(),
            error_exposure: app_data.error_exposure,
            dashboard_coordinator: Arc::new(DashboardCoordinator::new(app_data)),
        }
    }
}

/// API tags for dashboard endpoints
#[derive(Tags)]
enum DashboardTags {
    /// Registry statistics
    Dashboard,
}

#[OpenApi(prefix_path = "/dashboard")]
impl DashboardApi {
    /// Registry totals, distributions and monthly registrations for the current year
    #[oai(path = "/stats", method = "get", tag = "DashboardTags::Dashboard")]
    async fn stats(&self, req: &Request, auth: SessionAuth) -> Result<Json<DashboardResponse>, RegistryApiError> {
        let ctx = self
            .access_gate
            .authorize(req, auth.token(), Requirement::Admin)
            .await
            .map_err(|e| RegistryApiError::from_internal_error(e, self.error_exposure))?;
        let report = self
            .dashboard_coordinator
            .report(&ctx)
            .await
            .map_err(|e| RegistryApiError::from_internal_error(e, self.error_exposure))?;

        Ok(Json(report.into()))
    }
}
