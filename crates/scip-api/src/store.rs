//! User persistence
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

/// Stored user, including the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub wallet_address: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Fields needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("User not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; email and username must both be unused
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn find_by_id(&self, id: &str) -> Option<UserRecord>;

    async fn find_by_email(&self, email: &str) -> Option<UserRecord>;

    async fn find_by_username(&self, username: &str) -> Option<UserRecord>;

    async fn set_wallet(&self, id: &str, wallet_address: &str) -> StoreResult<UserRecord>;
}

#[derive(Default)]
struct Users {
    next_id: u64,
    by_id: HashMap<String, UserRecord>,
}

/// Process-local user store
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Users>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;

        if users.by_id.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if users.by_id.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }

        users.next_id += 1;
        let record = UserRecord {
            id: format!("user_{}", users.next_id),
            email: user.email,
            username: user.username,
            hashed_password: user.hashed_password,
            full_name: user.full_name,
            wallet_address: None,
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        users.by_id.insert(record.id.clone(), record.clone());

        info!("Created user {}", record.id);
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.users.read().await.by_id.get(id).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users
            .read()
            .await
            .by_id
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    async fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        self.users
            .read()
            .await
            .by_id
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    async fn set_wallet(&self, id: &str, wallet_address: &str) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        let user = users
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.wallet_address = Some(wallet_address.to_string());
        Ok(user.clone())
    }
}
