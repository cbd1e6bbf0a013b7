use crate::{
    modules::user::{model::InsertUser, schema::UserEntity},
    storage::StoreError,
};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] when the email is taken.
    async fn create(&self, user: &InsertUser) -> Result<(), StoreError>;
}
