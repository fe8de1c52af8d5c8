// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account directory.
//!
//! The gate only needs "identity by id" and the login flow only needs
//! "credentials by email"; both go through [`UserDirectory`]. The in-memory
//! implementation backs the server binary and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::auth::password::PasswordHasher;
use crate::auth::Role;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating an account.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a user is already registered with email {0}")]
    EmailTaken(String),

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write access to user accounts.
///
/// Email comparisons are case-insensitive.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<UserAccount>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>>;

    async fn create(&self, account: NewUserAccount, now: DateTime<Utc>) -> StoreResult<UserAccount>;

    async fn count(&self) -> StoreResult<usize>;
}

#[derive(Default)]
struct Accounts {
    by_id: HashMap<i64, UserAccount>,
    last_id: i64,
}

/// Process-local directory. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryStore {
    accounts: RwLock<Accounts>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an account. Tokens already issued for it stay signed but stop
    /// resolving.
    pub async fn delete(&self, id: i64) -> bool {
        self.accounts.write().await.by_id.remove(&id).is_some()
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<UserAccount>> {
        Ok(self.accounts.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_id
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, account: NewUserAccount, now: DateTime<Utc>) -> StoreResult<UserAccount> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .by_id
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(StoreError::EmailTaken(account.email));
        }

        accounts.last_id += 1;
        let created = UserAccount {
            id: accounts.last_id,
            email: account.email,
            password_hash: account.password_hash,
            full_name: account.full_name,
            role: account.role,
            created_at: now,
            updated_at: now,
        };
        accounts.by_id.insert(created.id, created.clone());
        tracing::info!(user_id = created.id, email = %created.email, "Created user account");
        Ok(created)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.accounts.read().await.by_id.len())
    }
}

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@test.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] crate::auth::password::PasswordError),
}

/// Create the default admin account when the directory is empty.
///
/// Returns the created account, or `None` if users already exist.
pub async fn seed_default_admin(
    users: &dyn UserDirectory,
    passwords: &dyn PasswordHasher,
    now: DateTime<Utc>,
) -> Result<Option<UserAccount>, SeedError> {
    if users.count().await? > 0 {
        tracing::info!("Users already exist, skipping default admin creation");
        return Ok(None);
    }

    let admin = users
        .create(
            NewUserAccount {
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password_hash: passwords.hash(DEFAULT_ADMIN_PASSWORD)?,
                full_name: DEFAULT_ADMIN_NAME.to_string(),
                role: Role::Admin,
            },
            now,
        )
        .await?;

    tracing::warn!(
        email = DEFAULT_ADMIN_EMAIL,
        "Default admin user created; change its password before exposing this server"
    );
    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::BcryptHasher;
    use crate::clock::{Clock, FixedClock};

    fn new_account(email: &str, role: Role) -> NewUserAccount {
        NewUserAccount {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            full_name: "Someone".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let now = FixedClock::at_epoch_seconds(1_700_000_000).now();

        let first = store.create(new_account("a@b.com", Role::User), now).await.unwrap();
        let second = store.create(new_account("c@d.com", Role::Agent), now).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, now);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.create(new_account("Ana@Inmo.com", Role::Agent), now).await.unwrap();

        let found = store.find_by_email("ana@inmo.COM").await.unwrap();
        assert_eq!(found.map(|a| a.email), Some("Ana@Inmo.com".to_string()));
        assert!(store.find_by_email("other@inmo.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.create(new_account("a@b.com", Role::User), now).await.unwrap();

        let result = store.create(new_account("A@B.com", Role::Admin), now).await;
        assert!(matches!(result, Err(StoreError::EmailTaken(_))));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleted_accounts_stop_resolving() {
        let store = InMemoryStore::new();
        let account = store.create(new_account("a@b.com", Role::User), Utc::now()).await.unwrap();

        assert!(store.delete(account.id).await);
        assert!(store.find_by_id(account.id).await.unwrap().is_none());
        assert!(!store.delete(account.id).await);
    }

    #[tokio::test]
    async fn seeds_admin_only_into_empty_directory() {
        let store = InMemoryStore::new();
        let hasher = BcryptHasher::with_cost(4);
        let now = Utc::now();

        let admin = seed_default_admin(&store, &hasher, now).await.unwrap().unwrap();
        assert_eq!(admin.email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(admin.role, Role::Admin);
        assert!(hasher.verify(DEFAULT_ADMIN_PASSWORD, &admin.password_hash));

        assert!(seed_default_admin(&store, &hasher, now).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
