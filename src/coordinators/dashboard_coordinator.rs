use std::sync::Arc;

use chrono::{Datelike, NaiveTime, TimeZone, Utc};

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::stores::{CourseStore, StudentStore};
use crate::types::db::student;
use crate::types::internal::context::RequestContext;
use crate::types::internal::dashboard::{CourseTotals, DashboardReport, fill_months, year_bounds};

const TOP_COURSES: usize = 5;
const TOP_BATCHES: usize = 10;
const RECENT_STUDENTS: u64 = 10;

/// Builds the dashboard report; every part is recomputed per request
pub struct DashboardCoordinator {
    student_store: Arc<StudentStore>,
    course_store: Arc<CourseStore>,
}

/// Unix-second range `[start of year, start of next year)`
fn year_range(year: i32) -> Result<(i64, i64), InternalError> {
    let invalid = || InternalError::parse("year", format!("{} is out of range", year));
    let (first, _) = year_bounds(year).ok_or_else(invalid)?;
    let (next, _) = year_bounds(year + 1).ok_or_else(invalid)?;
    Ok((
        Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN)).timestamp(),
        Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN)).timestamp(),
    ))
}

/// Registrations per month (1-12) from creation timestamps
fn month_counts(timestamps: &[i64]) -> Vec<(u32, u64)> {
    let mut counts = [0u64; 12];
    for ts in timestamps {
        if let Some(created) = Utc.timestamp_opt(*ts, 0).single() {
            counts[created.month0() as usize] += 1;
        }
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(index, count)| (index as u32 + 1, *count))
        .collect()
}

impl DashboardCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            student_store: app_data.student_store.clone(),
            course_store: app_data.course_store.clone(),
        }
    }

    /// Full report for the current calendar year; any failing part fails the whole report
    pub async fn report(&self, ctx: &RequestContext) -> Result<DashboardReport, InternalError> {
        let year = Utc::now().year();
        let (from, to) = year_range(year)?;

        let students = &self.student_store;
        let (
            student_totals,
            total_courses,
            active_courses,
            registrations,
            course_distribution,
            batch_distribution,
            status_breakdown,
            competency_breakdown,
            recent,
        ) = tokio::try_join!(
            students.totals(),
            self.course_store.count(None),
            self.course_store.count(Some(true)),
            students.created_between(from, to),
            students.group_counts(student::Column::CourseName, Some(TOP_COURSES)),
            students.group_counts(student::Column::Batch, Some(TOP_BATCHES)),
            students.group_counts(student::Column::Status, None),
            students.group_counts(student::Column::Competency, None),
            students.recent(RECENT_STUDENTS),
        )
        .inspect_err(|e| {
            tracing::error!(request_id = %ctx.request_id, "Dashboard report failed: {}", e)
        })?;

        Ok(DashboardReport {
            year,
            students: student_totals,
            courses: CourseTotals {
                total: total_courses,
                active: active_courses,
            },
            monthly: fill_months(&month_counts(&registrations)),
            course_distribution,
            batch_distribution,
            status_breakdown,
            competency_breakdown,
            recent,
        })
    }
}
