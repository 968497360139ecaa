//! Identity provider seam.
//!
//! Bearer tokens are issued by an external provider; the service only needs to
//! turn a token into a stable subject id. [`StaticTokenProvider`] is the
//! in-process implementation, seeded from a token grant file.

use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::user::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AppError>;
}

#[derive(Default)]
pub struct StaticTokenProvider {
    tokens: DashMap<String, Identity>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.insert(token.into(), identity);
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn verify(&self, token: &str) -> Result<Identity, AppError> {
        self.tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}

/// One entry of the token grant file.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Bootstraps the user's role at startup (how the first admin is created).
    pub role: Option<Role>,
}

impl TokenGrant {
    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

pub fn parse_grants(raw: &str) -> Result<Vec<TokenGrant>, AppError> {
    serde_json::from_str(raw)
        .map_err(|err| AppError::Internal(format!("invalid token grant file: {err}")))
}

pub fn load_grants(path: &Path) -> Result<Vec<TokenGrant>, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        AppError::Internal(format!("failed to read {}: {err}", path.display()))
    })?;
    parse_grants(&raw)
}
