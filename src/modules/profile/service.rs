use std::{collections::HashSet, sync::Arc};

use crate::{
    api::error,
    modules::profile::{
        model::{
            ListEmployersResponse, ListSchoolsResponse, ProfileFields, ProfileResponse,
            UpdateProfileModel,
        },
        repository::ProfileRepository,
        schema::{AttendEntity, EmploymentEntity},
    },
    storage::StoreError,
};

const MAX_TEXT_LEN: usize = 100;
const MAX_CATALOG_NAME_LEN: usize = 255;

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

#[derive(Clone)]
pub struct ProfileService {
    profile_repo: Arc<dyn ProfileRepository>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate(model: UpdateProfileModel) -> Result<ProfileFields, error::SystemError> {
    let mut seen = HashSet::with_capacity(model.interests.len());
    for interest in &model.interests {
        if interest.is_empty() {
            return Err(error::SystemError::invalid_argument("empty interest value"));
        }
        if too_long(interest, MAX_TEXT_LEN) {
            return Err(error::SystemError::invalid_argument("interest value is too long"));
        }
        if !seen.insert(interest.as_str()) {
            return Err(error::SystemError::invalid_argument("duplicate interest value"));
        }
    }

    for attend in &model.education {
        if attend.school.is_empty() {
            return Err(error::SystemError::invalid_argument("empty school value"));
        }
        if too_long(&attend.school, MAX_CATALOG_NAME_LEN) {
            return Err(error::SystemError::invalid_argument("school value is too long"));
        }
        if attend.year_graduated < 0 {
            return Err(error::SystemError::invalid_argument("negative year_graduated"));
        }
    }

    for employment in &model.professional {
        if employment.employer.is_empty() {
            return Err(error::SystemError::invalid_argument("empty employer value"));
        }
        if employment.job_title.is_empty() {
            return Err(error::SystemError::invalid_argument("empty job_title value"));
        }
        if too_long(&employment.employer, MAX_CATALOG_NAME_LEN) {
            return Err(error::SystemError::invalid_argument("employer value is too long"));
        }
        if too_long(&employment.job_title, MAX_TEXT_LEN) {
            return Err(error::SystemError::invalid_argument("job_title value is too long"));
        }
    }

    Ok(ProfileFields {
        sex: blank_to_none(model.sex),
        birthdate: model.birthdate,
        current_city: blank_to_none(model.current_city),
        hometown: blank_to_none(model.hometown),
        interests: model.interests,
        education: model
            .education
            .into_iter()
            .map(|a| AttendEntity { school_name: a.school, year_graduated: a.year_graduated })
            .collect(),
        professional: model
            .professional
            .into_iter()
            .map(|e| EmploymentEntity { employer_name: e.employer, job_title: e.job_title })
            .collect(),
    })
}

impl ProfileService {
    pub fn with_dependencies(profile_repo: Arc<dyn ProfileRepository>) -> Self {
        ProfileService { profile_repo }
    }

    pub async fn get_profile(&self, email: &str) -> Result<ProfileResponse, error::SystemError> {
        let profile = self.profile_repo.get(email).await.map_err(|e| match e {
            StoreError::NotFound => error::SystemError::not_found("").with_source(e),
            e => error::SystemError::internal(e),
        })?;
        Ok(ProfileResponse::from(profile))
    }

    /// Replaces the profile, then returns what the store committed.
    pub async fn update_profile(
        &self,
        email: &str,
        model: UpdateProfileModel,
    ) -> Result<ProfileResponse, error::SystemError> {
        let fields = validate(model)?;

        self.profile_repo.replace_all(email, &fields).await.map_err(|e| match e {
            StoreError::NotFound => error::SystemError::not_found("").with_source(e),
            StoreError::ForeignKey(_) => error::SystemError::invalid_argument(
                "unknown school or employer",
            )
            .with_source(e),
            e => error::SystemError::internal(e),
        })?;
        log::info!("Profile of {} updated", email);

        let profile = self.profile_repo.get(email).await?;
        Ok(ProfileResponse::from(profile))
    }

    pub async fn list_schools(&self) -> Result<ListSchoolsResponse, error::SystemError> {
        let schools = self.profile_repo.list_schools().await?;
        Ok(ListSchoolsResponse { schools })
    }

    pub async fn list_employers(&self) -> Result<ListEmployersResponse, error::SystemError> {
        let employers = self.profile_repo.list_employers().await?;
        Ok(ListEmployersResponse { employers })
    }
}
