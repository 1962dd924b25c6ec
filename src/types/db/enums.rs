use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;

/// Account role stored on every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// The role an admin toggle switches to
    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::User,
            Role::User => Role::Admin,
        }
    }
}

/// Assessment outcome recorded on a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "snake_case")]
pub enum Competency {
    #[sea_orm(string_value = "competent")]
    Competent,
    #[sea_orm(string_value = "incompetent")]
    Incompetent,
    #[sea_orm(string_value = "not_assessed")]
    NotAssessed,
}

impl Competency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Competency::Competent => "competent",
            Competency::Incompetent => "incompetent",
            Competency::NotAssessed => "not_assessed",
        }
    }
}

/// Enrolment status of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "snake_case")]
pub enum StudentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "discontinued")]
    Discontinued,
    #[sea_orm(string_value = "on_leave")]
    OnLeave,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Completed => "completed",
            StudentStatus::Discontinued => "discontinued",
            StudentStatus::OnLeave => "on_leave",
        }
    }
}

/// Unit of a course duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "snake_case")]
pub enum DurationUnit {
    #[default]
    #[sea_orm(string_value = "months")]
    Months,
    #[sea_orm(string_value = "years")]
    Years,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Months => "months",
            DurationUnit::Years => "years",
        }
    }
}

/// Error returned when a string does not name a variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not one of: {}",
            self.value,
            self.expected.join(", ")
        )
    }
}

macro_rules! impl_from_str {
    ($ty:ty, [$($text:literal => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($variant),)+
                    other => Err(UnknownVariant {
                        value: other.to_string(),
                        expected: &[$($text),+],
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_from_str!(Role, ["admin" => Role::Admin, "user" => Role::User]);
impl_from_str!(Competency, [
    "competent" => Competency::Competent,
    "incompetent" => Competency::Incompetent,
    "not_assessed" => Competency::NotAssessed,
]);
impl_from_str!(StudentStatus, [
    "active" => StudentStatus::Active,
    "inactive" => StudentStatus::Inactive,
    "completed" => StudentStatus::Completed,
    "discontinued" => StudentStatus::Discontinued,
    "on_leave" => StudentStatus::OnLeave,
]);
impl_from_str!(DurationUnit, ["months" => DurationUnit::Months, "years" => DurationUnit::Years]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_snake_case() {
        assert_eq!("on_leave".parse::<StudentStatus>(), Ok(StudentStatus::OnLeave));
        assert_eq!(" completed ".parse::<StudentStatus>(), Ok(StudentStatus::Completed));
    }

    #[test]
    fn test_unknown_competency_lists_expected_values() {
        let err = "excellent".parse::<Competency>().unwrap_err();
        assert_eq!(err.value, "excellent");
        assert_eq!(
            err.to_string(),
            "'excellent' is not one of: competent, incompetent, not_assessed"
        );
    }

    #[test]
    fn test_role_toggle() {
        assert_eq!(Role::Admin.toggled(), Role::User);
        assert_eq!(Role::User.toggled(), Role::Admin);
    }
}
