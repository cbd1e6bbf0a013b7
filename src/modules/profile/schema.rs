use chrono::NaiveDate;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AttendEntity {
    pub school_name: String,
    pub year_graduated: i32,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct EmploymentEntity {
    pub employer_name: String,
    pub job_title: String,
}

/// Persisted projection of a user's profile, joined with the user's names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEntity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub sex: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub current_city: Option<String>,
    pub hometown: Option<String>,
    pub interests: Vec<String>,
    pub education: Vec<AttendEntity>,
    pub professional: Vec<EmploymentEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SchoolEntity {
    pub school_name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub school_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EmployerEntity {
    pub employer_name: String,
}
