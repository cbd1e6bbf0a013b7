use crate::{
    modules::profile::{
        model::ProfileFields,
        schema::{EmployerEntity, ProfileEntity, SchoolEntity},
    },
    storage::StoreError,
};

#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    /// [`StoreError::NotFound`] when no user owns `email`.
    async fn get(&self, email: &str) -> Result<ProfileEntity, StoreError>;

    /// Replaces every profile field atomically. Unknown schools or employers
    /// fail with [`StoreError::ForeignKey`] and leave the profile untouched.
    async fn replace_all(&self, email: &str, fields: &ProfileFields) -> Result<(), StoreError>;

    async fn list_schools(&self) -> Result<Vec<SchoolEntity>, StoreError>;

    async fn list_employers(&self) -> Result<Vec<EmployerEntity>, StoreError>;
}
