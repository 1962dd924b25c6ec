// Coordinators layer - Workflow orchestration
//
// Coordinators sequence store and provider operations for each API operation.
// They take the request context for logging and self-action checks.

pub mod auth_coordinator;
pub mod course_coordinator;
pub mod dashboard_coordinator;
pub mod student_coordinator;
pub mod user_coordinator;

pub use auth_coordinator::AuthCoordinator;
pub use course_coordinator::CourseCoordinator;
pub use dashboard_coordinator::DashboardCoordinator;
pub use student_coordinator::StudentCoordinator;
pub use user_coordinator::UserCoordinator;
