use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{User, UserStore};
use crate::error::AppError;

type UserRow = (i64, String, String, bool, bool, DateTime<Utc>);

/// `users` table backed store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, is_active, is_staff, date_joined
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_none() {
            tracing::debug!(user_id = id, "No user with this id");
        }

        Ok(row.map(
            |(id, username, email, is_active, is_staff, date_joined)| User {
                id,
                username,
                email,
                is_active,
                is_staff,
                date_joined,
            },
        ))
    }
}
