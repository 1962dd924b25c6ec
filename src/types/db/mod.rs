// Database entities - SeaORM models
pub mod course;
pub mod enums;
pub mod student;
pub mod user;

pub use enums::{Competency, DurationUnit, Role, StudentStatus};
