use crate::{
    modules::user::{model::InsertUser, repository::UserRepository, schema::UserEntity},
    storage::StoreError,
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, StoreError> {
        let user = sqlx::query_as::<_, UserEntity>(
            "SELECT email, hash_password, first_name, last_name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: &InsertUser) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (email, hash_password, first_name, last_name) VALUES ($1, $2, $3, $4)",
        )
        .bind(&user.email)
        .bind(&user.hash_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO profiles (email) VALUES ($1)")
            .bind(&user.email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
