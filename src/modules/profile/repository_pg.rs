use chrono::NaiveDate;
use sqlx::prelude::FromRow;

use crate::{
    modules::profile::{
        model::ProfileFields,
        repository::ProfileRepository,
        schema::{AttendEntity, EmployerEntity, EmploymentEntity, ProfileEntity, SchoolEntity},
    },
    storage::StoreError,
};

#[derive(FromRow)]
struct ProfileRow {
    email: String,
    first_name: String,
    last_name: String,
    sex: Option<String>,
    birthdate: Option<NaiveDate>,
    current_city: Option<String>,
    hometown: Option<String>,
}

#[derive(Clone)]
pub struct ProfileRepositoryPg {
    pool: sqlx::PgPool,
}

impl ProfileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryPg {
    async fn get(&self, email: &str) -> Result<ProfileEntity, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT u.email, u.first_name, u.last_name,
                   p.sex, p.birthdate, p.current_city, p.hometown
            FROM users u
            LEFT JOIN profiles p ON p.email = u.email
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let (interests, education, professional) = tokio::try_join!(
            sqlx::query_scalar::<_, String>(
                "SELECT interest FROM interests WHERE email = $1 ORDER BY position",
            )
            .bind(email)
            .fetch_all(&self.pool),
            sqlx::query_as::<_, AttendEntity>(
                "SELECT school_name, year_graduated FROM attends WHERE email = $1 ORDER BY position",
            )
            .bind(email)
            .fetch_all(&self.pool),
            sqlx::query_as::<_, EmploymentEntity>(
                "SELECT employer_name, job_title FROM employments WHERE email = $1 ORDER BY position",
            )
            .bind(email)
            .fetch_all(&self.pool),
        )?;

        Ok(ProfileEntity {
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            sex: row.sex,
            birthdate: row.birthdate,
            current_city: row.current_city,
            hometown: row.hometown,
            interests,
            education,
            professional,
        })
    }

    async fn replace_all(&self, email: &str, fields: &ProfileFields) -> Result<(), StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(StoreError::NotFound);
        }

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO profiles (email, sex, birthdate, current_city, hometown)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE
            SET sex = EXCLUDED.sex,
                birthdate = EXCLUDED.birthdate,
                current_city = EXCLUDED.current_city,
                hometown = EXCLUDED.hometown
            "#,
        )
        .bind(email)
        .bind(&fields.sex)
        .bind(fields.birthdate)
        .bind(&fields.current_city)
        .bind(&fields.hometown)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM interests WHERE email = $1").bind(email).execute(&mut *tx).await?;
        for (position, interest) in fields.interests.iter().enumerate() {
            sqlx::query("INSERT INTO interests (email, interest, position) VALUES ($1, $2, $3)")
                .bind(email)
                .bind(interest)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM attends WHERE email = $1").bind(email).execute(&mut *tx).await?;
        for (position, attend) in fields.education.iter().enumerate() {
            sqlx::query(
                "INSERT INTO attends (email, school_name, year_graduated, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(email)
            .bind(&attend.school_name)
            .bind(attend.year_graduated)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM employments WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await?;
        for (position, employment) in fields.professional.iter().enumerate() {
            sqlx::query(
                "INSERT INTO employments (email, employer_name, job_title, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(email)
            .bind(&employment.employer_name)
            .bind(&employment.job_title)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_schools(&self) -> Result<Vec<SchoolEntity>, StoreError> {
        let schools = sqlx::query_as::<_, SchoolEntity>(
            "SELECT school_name, type FROM schools ORDER BY school_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(schools)
    }

    async fn list_employers(&self) -> Result<Vec<EmployerEntity>, StoreError> {
        let employers = sqlx::query_as::<_, EmployerEntity>(
            "SELECT employer_name FROM employers ORDER BY employer_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employers)
    }
}
