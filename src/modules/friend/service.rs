use log::{debug, info};
use std::sync::Arc;

use crate::{
    api::error,
    modules::friend::{
        model::{
            FriendRequestResponse, FriendResponse, ListFriendRequestsResponse,
            ListFriendsResponse, SearchUsersQuery, SearchUsersResponse,
        },
        repository::FriendRepository,
        schema::FriendshipEntity,
    },
    storage::StoreError,
};

/// Stateless orchestrator over the friendship store. Pair states from the
/// requester's side: absent, pending outbound, pending inbound, connected.
#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRepository>,
}

impl FriendService {
    pub fn with_dependencies(friend_repo: Arc<dyn FriendRepository>) -> Self {
        FriendService { friend_repo }
    }

    pub async fn search_users(
        &self,
        filter: &SearchUsersQuery,
    ) -> Result<SearchUsersResponse, error::SystemError> {
        let users = self.friend_repo.search_users(filter).await?;
        Ok(SearchUsersResponse { count: users.len(), users })
    }

    pub async fn list_friends(&self, email: &str) -> Result<ListFriendsResponse, error::SystemError> {
        let friendships = self.friend_repo.list_connected(email).await?;

        let friends = friendships
            .into_iter()
            .map(|f| FriendResponse {
                friend_email: f.counterpart(email).to_string(),
                relationship: f.relationship,
                date_connected: f.connected_at,
            })
            .collect();

        Ok(ListFriendsResponse { friends })
    }

    pub async fn list_friend_requests(
        &self,
        email: &str,
    ) -> Result<ListFriendRequestsResponse, error::SystemError> {
        let friendships = self.friend_repo.list_pending_touching(email).await?;

        let mut res = ListFriendRequestsResponse::default();
        for f in friendships {
            if f.requester_email.eq_ignore_ascii_case(email) {
                res.request_to.push(FriendRequestResponse {
                    email: f.recipient_email.clone(),
                    relationship: f.relationship.clone(),
                });
            }
            if f.recipient_email.eq_ignore_ascii_case(email) {
                res.request_from.push(FriendRequestResponse {
                    email: f.requester_email,
                    relationship: f.relationship,
                });
            }
        }

        Ok(res)
    }

    /// Sends a request, or relabels one that is still pending. Only the
    /// forward pair (requester, recipient) is consulted; an inbound request
    /// from the recipient is a separate row and stays untouched.
    pub async fn create_or_update_friend_request(
        &self,
        requester: &str,
        recipient: &str,
        relationship: &str,
    ) -> Result<(), error::SystemError> {
        if requester.eq_ignore_ascii_case(recipient) {
            return Err(error::SystemError::invalid_argument("can't be friend with yourself"));
        }

        let existing = self
            .friend_repo
            .get_by_ordered_pair(requester, recipient)
            .await
            .map_err(error::SystemError::internal)?;

        let Some(mut friendship) = existing else {
            return self.insert_friend_request(requester, recipient, relationship).await;
        };

        if friendship.is_connected() {
            return Err(error::SystemError::already_exists(format!(
                "{requester} and {recipient} already friends"
            )));
        }

        friendship.relationship = relationship.to_string();
        self.friend_repo.update(&friendship).await.map_err(|e| match e {
            StoreError::NotFound => error::SystemError::failed_precondition(format!(
                "the friend request from {requester} to {recipient} no longer exists"
            ))
            .with_source(e),
            e => error::SystemError::internal(e),
        })?;

        debug!("Friend request {requester} -> {recipient} relabeled");
        Ok(())
    }

    async fn insert_friend_request(
        &self,
        requester: &str,
        recipient: &str,
        relationship: &str,
    ) -> Result<(), error::SystemError> {
        let friendship = FriendshipEntity::pending(requester, recipient, relationship);

        match self.friend_repo.insert(&friendship).await {
            Ok(()) => {
                info!("Friend request {requester} -> {recipient} created");
                Ok(())
            }
            Err(e @ StoreError::ForeignKey(_)) => Err(error::SystemError::not_found(format!(
                "the requested email is not found: email={requester} friend_email={recipient}"
            ))
            .with_source(e)),
            Err(e @ StoreError::AlreadyExists(_)) => Err(error::SystemError::already_exists(
                format!("a friend request from {requester} to {recipient} already exists"),
            )
            .with_source(e)),
            Err(e) => Err(error::SystemError::internal(e)),
        }
    }

    /// Accepts the pending request sent to `accepter` by `requester`.
    pub async fn accept_friend_request(
        &self,
        accepter: &str,
        requester: &str,
    ) -> Result<(), error::SystemError> {
        if accepter.eq_ignore_ascii_case(requester) {
            return Err(error::SystemError::invalid_argument("2 email must be different"));
        }

        let not_pending = || {
            error::SystemError::failed_precondition(format!(
                "the friend request from {requester} to {accepter} does not exist"
            ))
        };

        let mut friendship = self
            .friend_repo
            .get_by_ordered_pair(requester, accepter)
            .await
            .map_err(error::SystemError::internal)?
            .ok_or_else(not_pending)?;

        if friendship.is_connected() {
            return Err(error::SystemError::already_exists(format!(
                "{accepter} already accepted the request from {requester}"
            )));
        }

        friendship.connected_at = Some(chrono::Utc::now());
        self.friend_repo.update(&friendship).await.map_err(|e| match e {
            StoreError::NotFound => not_pending().with_source(e),
            e => error::SystemError::internal(e),
        })?;

        info!("Friend request {requester} -> {accepter} accepted");
        Ok(())
    }

    /// Withdraws the caller's own outbound request, keyed (email, friend_email).
    pub async fn cancel_friend_request(
        &self,
        email: &str,
        friend_email: &str,
    ) -> Result<(), error::SystemError> {
        self.friend_repo.delete_by_ordered_pair(email, friend_email).await.map_err(|e| {
            error::SystemError::new(error::ErrorKind::Internal, "failed to delete friend request")
                .with_source(e)
        })?;
        debug!("Friend request {email} -> {friend_email} cancelled");
        Ok(())
    }

    /// Declines a request addressed to the caller, keyed (friend_email, email).
    pub async fn reject_friend_request(
        &self,
        email: &str,
        friend_email: &str,
    ) -> Result<(), error::SystemError> {
        self.friend_repo.delete_by_ordered_pair(friend_email, email).await.map_err(|e| {
            error::SystemError::new(error::ErrorKind::Internal, "failed to delete friend request")
                .with_source(e)
        })?;
        debug!("Friend request {friend_email} -> {email} rejected");
        Ok(())
    }
}
