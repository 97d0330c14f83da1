//! In-process repositories backed by `DashMap`.
//!
//! Used for tests and for running the server without PostgreSQL. Each
//! mutation touches a single map entry, which gives the same per-record
//! atomicity as a single-row update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::AuthResult;
use super::repository::{AccountRepository, RefreshTokenRepository};
use crate::models::auth::{AccountSummary, AccountWithPassword, RefreshTokenRecord};

/// In-memory accounts, keyed by email.
#[derive(Default)]
pub struct MemoryAccounts {
    by_email: DashMap<String, AccountWithPassword>,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<AccountWithPassword>> {
        Ok(self.by_email.get(email).map(|entry| entry.value().clone()))
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
    ) -> AuthResult<Option<AccountSummary>> {
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let account = AccountSummary {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    created_at: now,
                    updated_at: now,
                    is_chirpy_red: false,
                };
                slot.insert(AccountWithPassword {
                    account: account.clone(),
                    password_hash: password_hash.to_string(),
                });
                Ok(Some(account))
            }
        }
    }

    async fn mark_upgraded(&self, id: Uuid) -> AuthResult<bool> {
        for mut entry in self.by_email.iter_mut() {
            if entry.account.id == id {
                entry.account.is_chirpy_red = true;
                entry.account.updated_at = Utc::now();
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// In-memory refresh tokens, keyed by token hash.
#[derive(Default)]
pub struct MemoryRefreshTokens {
    records: DashMap<String, RefreshTokenRecord>,
}

impl MemoryRefreshTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, revoked or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryRefreshTokens {
    async fn insert(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        self.records
            .insert(record.token_hash.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        Ok(self.records.get(token_hash).map(|entry| entry.value().clone()))
    }

    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> AuthResult<bool> {
        match self.records.get_mut(token_hash) {
            Some(mut record) => {
                record.revoked_at.get_or_insert(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
