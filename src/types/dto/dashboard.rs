use poem_openapi::Object;

use crate::types::db::{Competency, StudentStatus};
use crate::types::internal::dashboard::{Bucket, DashboardReport, RecentStudent};

#[derive(Object, Debug, PartialEq)]
pub struct StudentTotalsResponse {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
}

#[derive(Object, Debug, PartialEq)]
pub struct CourseTotalsResponse {
    pub total: u64,
    pub active: u64,
}

#[derive(Object, Debug, PartialEq)]
pub struct TotalsResponse {
    pub students: StudentTotalsResponse,
    pub courses: CourseTotalsResponse,
}

#[derive(Object, Debug, PartialEq)]
pub struct BucketResponse {
    pub label: String,
    pub count: u64,
}

impl From<Bucket> for BucketResponse {
    fn from(bucket: Bucket) -> Self {
        Self {
            label: bucket.label,
            count: bucket.count,
        }
    }
}

#[derive(Object, Debug, PartialEq)]
pub struct RecentStudentResponse {
    pub id: String,
    pub student_name: String,
    pub student_id: String,
    pub status: StudentStatus,
    pub competency: Competency,
    pub created_at: i64,
}

impl From<RecentStudent> for RecentStudentResponse {
    fn from(r: RecentStudent) -> Self {
        Self {
            id: r.id,
            student_name: r.student_name,
            student_id: r.student_id,
            status: r.status,
            competency: r.competency,
            created_at: r.created_at,
        }
    }
}

/// Dashboard report
#[derive(Object, Debug)]
pub struct DashboardResponse {
    /// Calendar year of `monthly_data`
    pub year: i32,
    pub totals: TotalsResponse,
    /// Registrations per month, `Jan` to `Dec`
    pub monthly_data: Vec<BucketResponse>,
    /// Top 5 courses by student count
    pub course_distribution: Vec<BucketResponse>,
    pub status_distribution: Vec<BucketResponse>,
    pub competency_stats: Vec<BucketResponse>,
    /// Top 10 batches by student count
    pub batch_distribution: Vec<BucketResponse>,
    /// Ten most recently created students
    pub recent_activities: Vec<RecentStudentResponse>,
}

fn buckets(list: Vec<Bucket>) -> Vec<BucketResponse> {
    list.into_iter().map(BucketResponse::from).collect()
}

impl From<DashboardReport> for DashboardResponse {
    fn from(report: DashboardReport) -> Self {
        Self {
            year: report.year,
            totals: TotalsResponse {
                students: StudentTotalsResponse {
                    total: report.students.total,
                    active: report.students.active,
                    completed: report.students.completed,
                },
                courses: CourseTotalsResponse {
                    total: report.courses.total,
                    active: report.courses.active,
                },
            },
            monthly_data: buckets(report.monthly),
            course_distribution: buckets(report.course_distribution),
            status_distribution: buckets(report.status_breakdown),
            competency_stats: buckets(report.competency_breakdown),
            batch_distribution: buckets(report.batch_distribution),
            recent_activities: report
                .recent
                .into_iter()
                .map(RecentStudentResponse::from)
                .collect(),
        }
    }
}
