use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::repo_types::{User, UserFields, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("cast to object id failed for value `{0}`")]
    InvalidId(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Document-style access to the users collection: equality filters, insert, update, delete.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Vec<User>, StoreError>;
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Vec<User>, StoreError>;
    async fn insert(&self, fields: UserFields) -> Result<User, StoreError>;
    /// Returns the number of records matched.
    async fn update_by_id(&self, id: &str, fields: UserFields) -> Result<u64, StoreError>;
    /// Returns the number of records deleted.
    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, age, created_at, updated_at
            FROM users
            WHERE name = $1
            ORDER BY seq
            "#,
        )
        .bind(name)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, age, created_at, updated_at
            FROM users
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<User>, StoreError> {
        let id = UserId::parse(id)?;
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, age, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(&id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, fields: UserFields) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password, age)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password, age, created_at, updated_at
            "#,
        )
        .bind(UserId::generate())
        .bind(fields.name)
        .bind(fields.email)
        .bind(fields.password)
        .bind(fields.age)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_by_id(&self, id: &str, fields: UserFields) -> Result<u64, StoreError> {
        let id = UserId::parse(id)?;
        let res = sqlx::query(
            r#"
            UPDATE users
               SET name = $2, email = $3, password = $4, age = $5, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(&id)
        .bind(fields.name)
        .bind(fields.email)
        .bind(fields.password)
        .bind(fields.age)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let id = UserId::parse(id)?;
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(&id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
