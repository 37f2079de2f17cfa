//! Session Oracle
//!
//! Handlers never look sessions up themselves; they receive a
//! [`CallerResolver`] and ask it to turn a bearer token into a user id.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AgencyError, Result};
use crate::id::UserId;

/// Resolve the current caller or fail
#[async_trait]
pub trait CallerResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<UserId>;
}

/// Issue session tokens after signup
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn issue(&self, user_id: &UserId) -> Result<String>;
}

/// In-memory token table (for development and tests)
#[derive(Default)]
pub struct MemorySessions {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known token for a user
    pub async fn insert(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.write().await.insert(token.into(), user_id);
    }

    pub async fn revoke(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }
}

#[async_trait]
impl CallerResolver for MemorySessions {
    async fn resolve(&self, token: &str) -> Result<UserId> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| AgencyError::Unauthorized("unknown session token".into()))
    }
}

#[async_trait]
impl SessionIssuer for MemorySessions {
    async fn issue(&self, user_id: &UserId) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.insert(token.clone(), user_id.clone()).await;
        Ok(token)
    }
}
