use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::utils::connected_date_format;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FriendRequestBody {
    #[serde(default)]
    #[validate(length(max = 255, message = "Relationship is too long"))]
    pub relationship: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchUsersQuery {
    pub email: Option<String>,
    pub name: Option<String>,
    pub hometown: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SearchUsersQuery {
    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn hometown(&self) -> Option<&str> {
        non_empty(&self.hometown)
    }

    pub fn is_empty(&self) -> bool {
        self.email().is_none() && self.name().is_none() && self.hometown().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserSummary {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub hometown: String,
}

#[derive(Debug, Serialize)]
pub struct SearchUsersResponse {
    pub count: usize,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FriendRequestResponse {
    pub email: String,
    pub relationship: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ListFriendRequestsResponse {
    /// Pending requests sent by the caller.
    pub request_to: Vec<FriendRequestResponse>,
    /// Pending requests addressed to the caller.
    pub request_from: Vec<FriendRequestResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendResponse {
    pub friend_email: String,
    pub relationship: String,
    #[serde(with = "connected_date_format")]
    pub date_connected: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default, Serialize)]
pub struct ListFriendsResponse {
    pub friends: Vec<FriendResponse>,
}
