use serde::Serialize;
use sqlx::prelude::FromRow;

/// One row per ordered (requester, recipient) pair. Pending while
/// `connected_at` is unset.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub requester_email: String,
    pub recipient_email: String,
    pub relationship: String,
    pub connected_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl FriendshipEntity {
    pub fn pending(requester_email: &str, recipient_email: &str, relationship: &str) -> Self {
        FriendshipEntity {
            requester_email: requester_email.to_string(),
            recipient_email: recipient_email.to_string(),
            relationship: relationship.to_string(),
            connected_at: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected_at.is_some()
    }

    /// The side of the pair that is not `email`.
    pub fn counterpart(&self, email: &str) -> &str {
        if self.requester_email.eq_ignore_ascii_case(email) {
            &self.recipient_email
        } else {
            &self.requester_email
        }
    }
}
