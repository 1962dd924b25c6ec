// API data transfer objects
pub mod admin;
pub mod auth;
pub mod common;
pub mod course;
pub mod dashboard;
pub mod student;
