use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    modules::profile::schema::{
        AttendEntity, EmployerEntity, EmploymentEntity, ProfileEntity, SchoolEntity,
    },
    utils::date_format,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendModel {
    pub school: String,
    #[serde(default)]
    pub year_graduated: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentModel {
    pub employer: String,
    pub job_title: String,
}

fn validate_sex(sex: &str) -> Result<(), ValidationError> {
    match sex {
        "" | "M" | "F" => Ok(()),
        _ => Err(ValidationError::new("sex").with_message("Sex must be one of '', 'M', 'F'".into())),
    }
}

/// Full replacement of the caller's profile. Omitted lists clear the
/// stored ones.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileModel {
    #[validate(custom(function = "validate_sex"))]
    pub sex: Option<String>,
    #[serde(default, with = "date_format")]
    pub birthdate: Option<NaiveDate>,
    #[validate(length(max = 100, message = "Current city is too long"))]
    pub current_city: Option<String>,
    #[validate(length(max = 100, message = "Hometown is too long"))]
    pub hometown: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub education: Vec<AttendModel>,
    #[serde(default)]
    pub professional: Vec<EmploymentModel>,
}

/// Validated input handed to the profile store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub sex: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub current_city: Option<String>,
    pub hometown: Option<String>,
    pub interests: Vec<String>,
    pub education: Vec<AttendEntity>,
    pub professional: Vec<EmploymentEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(with = "date_format", skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hometown: Option<String>,
    pub interests: Vec<String>,
    pub education: Vec<AttendModel>,
    pub professional: Vec<EmploymentModel>,
}

impl From<ProfileEntity> for ProfileResponse {
    fn from(entity: ProfileEntity) -> Self {
        ProfileResponse {
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            sex: entity.sex,
            birthdate: entity.birthdate,
            current_city: entity.current_city,
            hometown: entity.hometown,
            interests: entity.interests,
            education: entity
                .education
                .into_iter()
                .map(|a| AttendModel { school: a.school_name, year_graduated: a.year_graduated })
                .collect(),
            professional: entity
                .professional
                .into_iter()
                .map(|e| EmploymentModel { employer: e.employer_name, job_title: e.job_title })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListSchoolsResponse {
    pub schools: Vec<SchoolEntity>,
}

#[derive(Debug, Serialize)]
pub struct ListEmployersResponse {
    pub employers: Vec<EmployerEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_model_parses_birthdate() {
        let json = r#"{"sex":"F","birthdate":"24/12/1999","interests":["chess"]}"#;
        let model: UpdateProfileModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.birthdate, NaiveDate::from_ymd_opt(1999, 12, 24));
        assert!(model.education.is_empty());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_update_model_empty_birthdate_is_absent() {
        let model: UpdateProfileModel = serde_json::from_str(r#"{"birthdate":""}"#).unwrap();
        assert_eq!(model.birthdate, None);
    }

    #[test]
    fn test_update_model_rejects_bad_birthdate_and_sex() {
        assert!(serde_json::from_str::<UpdateProfileModel>(r#"{"birthdate":"1999-12-24"}"#).is_err());

        let model: UpdateProfileModel = serde_json::from_str(r#"{"sex":"X"}"#).unwrap();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_update_model_rejects_overlong_places() {
        let model = UpdateProfileModel { hometown: Some("a".repeat(100)), ..Default::default() };
        assert!(model.validate().is_ok());

        let model = UpdateProfileModel { hometown: Some("a".repeat(101)), ..Default::default() };
        assert!(model.validate().is_err());

        let model =
            UpdateProfileModel { current_city: Some("a".repeat(101)), ..Default::default() };
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_response_omits_absent_birthdate() {
        let response = ProfileResponse::from(ProfileEntity {
            email: "foo@mock.com".into(),
            first_name: "Foo".into(),
            last_name: "Bar".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("birthdate").is_none());
        assert_eq!(json["interests"], serde_json::json!([]));

        let response = ProfileResponse {
            birthdate: NaiveDate::from_ymd_opt(2001, 2, 3),
            ..response
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["birthdate"], "03/02/2001");
    }
}
