use crate::error::{StoreError, StoreResult};
use crate::models::{NewUser, User, UserType};
use std::collections::HashMap;
use std::sync::RwLock;

struct Inner {
    rows: HashMap<i64, User>,
    next_id: i64,
}

/// Repository for user profiles
pub struct UserRepository {
    inner: RwLock<Inner>,
}

impl UserRepository {
    /// Create a new, empty UserRepository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a new user
    ///
    /// Usernames are unique; inserting an existing one fails with a
    /// duplicate error and leaves the store unchanged.
    pub fn create(&self, input: NewUser) -> StoreResult<User> {
        if input.username.trim().is_empty() {
            return Err(StoreError::InvalidInput("username is required".to_string()));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("create"))?;

        if inner.rows.values().any(|u| u.username == input.username) {
            return Err(StoreError::Duplicate(format!(
                "username '{}' is already taken",
                input.username
            )));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let now = chrono::Utc::now().naive_utc();

        let user = User {
            id,
            username: input.username,
            display_name: input.display_name,
            phone_number: input.phone_number,
            user_type: input
                .user_type
                .unwrap_or(UserType::Farmer)
                .as_str()
                .to_string(),
            location: input.location,
            created_at: now,
            updated_at: now,
        };

        inner.rows.insert(id, user.clone());
        Ok(user)
    }

    /// Find a user by id
    pub fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_id"))?;
        Ok(inner.rows.get(&id).cloned())
    }

    /// Find a user by username
    pub fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_username"))?;
        Ok(inner
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}
