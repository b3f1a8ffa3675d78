use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// In-process user store with the same uniqueness rules as the `users` table.
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    /// Fails if a row other than `skip_id` already holds any of these values.
    fn check_unique(
        &self,
        skip_id: Option<i32>,
        username: &str,
        phone: &str,
        email: &str,
    ) -> Result<(), StoreError> {
        let others = self
            .rows
            .values()
            .filter(|u| Some(u.user_id) != skip_id);

        for other in others {
            let field = if other.username == username {
                "username"
            } else if other.phone == phone {
                "phone"
            } else if other.email == email {
                "email"
            } else {
                continue;
            };
            return Err(StoreError::Conflict { field: Some(field) });
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_unique(None, &user.username, &user.phone, &user.email)?;

        let user_id = inner.next_id;
        inner.next_id = user_id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        let user = user.into_user(user_id);
        inner.rows.insert(user_id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&user.user_id) {
            return Ok(None);
        }
        inner.check_unique(Some(user.user_id), &user.username, &user.phone, &user.email)?;

        inner.rows.insert(user.user_id, user.clone());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }
}
