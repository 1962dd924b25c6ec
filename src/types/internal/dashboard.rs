use chrono::NaiveDate;

use crate::types::db::{Competency, StudentStatus};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentTotals {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseTotals {
    pub total: u64,
    pub active: u64,
}

/// Group label with its member count
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentStudent {
    pub id: String,
    pub student_name: String,
    pub student_id: String,
    pub status: StudentStatus,
    pub competency: Competency,
    pub created_at: i64,
}

/// Point-in-time dashboard summary, recomputed per request
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub year: i32,
    pub students: StudentTotals,
    pub courses: CourseTotals,
    /// Twelve entries, January first
    pub monthly: Vec<Bucket>,
    pub course_distribution: Vec<Bucket>,
    pub batch_distribution: Vec<Bucket>,
    pub status_breakdown: Vec<Bucket>,
    pub competency_breakdown: Vec<Bucket>,
    pub recent: Vec<RecentStudent>,
}

/// Zero-fill per-month counts (month numbers 1-12) into labelled buckets
pub fn fill_months(counts: &[(u32, u64)]) -> Vec<Bucket> {
    MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| Bucket {
            label: label.to_string(),
            count: counts
                .iter()
                .filter(|(month, _)| *month as usize == index + 1)
                .map(|(_, count)| count)
                .sum(),
        })
        .collect()
}

/// First and last day of a calendar year
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_months_zero_fills_gaps() {
        let monthly = fill_months(&[(2, 4), (11, 1)]);
        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0], Bucket { label: "Jan".into(), count: 0 });
        assert_eq!(monthly[1].count, 4);
        assert_eq!(monthly[10], Bucket { label: "Nov".into(), count: 1 });
        assert_eq!(monthly.iter().map(|b| b.count).sum::<u64>(), 5);
    }
}
