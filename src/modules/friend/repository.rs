use crate::{
    modules::friend::{
        model::{SearchUsersQuery, UserSummary},
        schema::FriendshipEntity,
    },
    storage::StoreError,
};

#[async_trait::async_trait]
pub trait FriendRepository: Send + Sync {
    async fn get_by_ordered_pair(
        &self,
        requester_email: &str,
        recipient_email: &str,
    ) -> Result<Option<FriendshipEntity>, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the ordered pair is taken
    /// and [`StoreError::ForeignKey`] if either email is not a user.
    async fn insert(&self, friendship: &FriendshipEntity) -> Result<(), StoreError>;

    async fn update(&self, friendship: &FriendshipEntity) -> Result<(), StoreError>;

    async fn delete_by_ordered_pair(
        &self,
        requester_email: &str,
        recipient_email: &str,
    ) -> Result<(), StoreError>;

    async fn list_pending_touching(&self, email: &str)
    -> Result<Vec<FriendshipEntity>, StoreError>;

    async fn list_connected(&self, email: &str) -> Result<Vec<FriendshipEntity>, StoreError>;

    /// Users matching ANY of the supplied criteria.
    async fn search_users(&self, filter: &SearchUsersQuery)
    -> Result<Vec<UserSummary>, StoreError>;
}
