use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
