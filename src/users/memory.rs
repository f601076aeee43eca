use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{User, UserStore};
use crate::error::AppError;

/// Process-local store, used by tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<i64, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    pub fn insert(&self, user: User) {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(user.id, user);
    }

    pub fn remove(&self, id: i64) -> Option<User> {
        self.users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&id)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self
            .users
            .read()
            .map_err(|_| AppError::Internal("user store lock poisoned".to_string()))?;
        Ok(users.get(&id).cloned())
    }
}
