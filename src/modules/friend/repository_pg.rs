use crate::{
    modules::friend::{
        model::{SearchUsersQuery, UserSummary},
        repository::FriendRepository,
        schema::FriendshipEntity,
    },
    storage::StoreError,
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(value: &str) -> String {
    format!("%{}%", value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"))
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn get_by_ordered_pair(
        &self,
        requester_email: &str,
        recipient_email: &str,
    ) -> Result<Option<FriendshipEntity>, StoreError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT requester_email, recipient_email,
                   COALESCE(relationship, '') AS relationship, connected_at
            FROM friendships
            WHERE requester_email = $1 AND recipient_email = $2
            "#,
        )
        .bind(requester_email)
        .bind(recipient_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn insert(&self, friendship: &FriendshipEntity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO friendships (requester_email, recipient_email, relationship, connected_at)
            VALUES ($1, $2, NULLIF($3, ''), $4)
            "#,
        )
        .bind(&friendship.requester_email)
        .bind(&friendship.recipient_email)
        .bind(&friendship.relationship)
        .bind(friendship.connected_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, friendship: &FriendshipEntity) -> Result<(), StoreError> {
        let rows = sqlx::query(
            r#"
            UPDATE friendships
            SET relationship = NULLIF($3, ''), connected_at = $4
            WHERE requester_email = $1 AND recipient_email = $2
            "#,
        )
        .bind(&friendship.requester_email)
        .bind(&friendship.recipient_email)
        .bind(&friendship.relationship)
        .bind(friendship.connected_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_ordered_pair(
        &self,
        requester_email: &str,
        recipient_email: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM friendships WHERE requester_email = $1 AND recipient_email = $2")
            .bind(requester_email)
            .bind(recipient_email)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_pending_touching(
        &self,
        email: &str,
    ) -> Result<Vec<FriendshipEntity>, StoreError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT requester_email, recipient_email,
                   COALESCE(relationship, '') AS relationship, connected_at
            FROM friendships
            WHERE (requester_email = $1 OR recipient_email = $1)
              AND connected_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_connected(&self, email: &str) -> Result<Vec<FriendshipEntity>, StoreError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT requester_email, recipient_email,
                   COALESCE(relationship, '') AS relationship, connected_at
            FROM friendships
            WHERE (requester_email = $1 OR recipient_email = $1)
              AND connected_at IS NOT NULL
            ORDER BY connected_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn search_users(
        &self,
        filter: &SearchUsersQuery,
    ) -> Result<Vec<UserSummary>, StoreError> {
        // Absent criteria bind NULL and drop out of the OR.
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.email, u.first_name, u.last_name, COALESCE(p.hometown, '') AS hometown
            FROM users u
            LEFT JOIN profiles p ON p.email = u.email
            WHERE lower(u.email) = lower($1)
               OR u.first_name ILIKE $2
               OR u.last_name ILIKE $2
               OR p.hometown ILIKE $3
            ORDER BY u.last_name, u.first_name
            "#,
        )
        .bind(filter.email())
        .bind(filter.name().map(like_pattern))
        .bind(filter.hometown().map(like_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
