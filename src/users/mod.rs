/// User records
///
/// The identity resolver only ever needs lookup by primary key, so that is
/// the whole `UserStore` seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;

mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// Lookup-by-identifier access to user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Ok(None)` when no user has this id (e.g. deleted after the token
    /// was issued).
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}
