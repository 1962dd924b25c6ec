// Stores layer - sea-orm data access per registry
pub mod course_store;
pub mod credential_store;
pub mod student_store;

pub use course_store::CourseStore;
pub use credential_store::CredentialStore;
pub use student_store::StudentStore;

use sea_orm::sea_query::LikeExpr;

const LIKE_ESCAPE: char = '|';

/// `LIKE` pattern matching `term` anywhere, with `%` and `_` taken literally
pub(crate) fn contains_literal(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}
