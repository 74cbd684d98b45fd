//! Mock authentication behind a trait seam.
//!
//! Nothing here is a security model. [`Authenticator`] is the seam a real
//! identity provider would plug into; [`MockAuthenticator`] mints
//! predictable identities so the rest of the app can treat sign-in as
//! solved. Social logins always succeed, email logins accept exactly one
//! development password.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{self, ProfileStore, SESSION_KEY};

/// Password accepted by every mock email login.
pub const MOCK_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Email,
    Google,
    Apple,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub provider: AuthProvider,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn email_login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            provider: AuthProvider::Email,
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    pub fn social_login(provider: AuthProvider) -> Self {
        Self {
            provider,
            email: None,
            password: None,
        }
    }
}

/// A signed-in identity. The token is opaque and only proves "logged in"
/// to the mock flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub token: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    async fn log_out(&self, session: &Session) -> Result<(), AuthError>;
}

pub struct MockAuthenticator;

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        match credentials.provider {
            AuthProvider::Google => Ok(session(
                "mock-google-user",
                "Google User",
                Some("googleuser@example.com"),
            )),
            AuthProvider::Apple => Ok(session(
                "mock-apple-user",
                "Apple User",
                Some("appleuser@example.com"),
            )),
            AuthProvider::Email => {
                let (Some(email), Some(password)) =
                    (credentials.email.as_deref(), credentials.password.as_deref())
                else {
                    return Err(AuthError::MissingCredentials);
                };
                if email.trim().is_empty() || password.is_empty() {
                    return Err(AuthError::MissingCredentials);
                }
                if password != MOCK_PASSWORD {
                    return Err(AuthError::InvalidCredentials);
                }

                let display_name = email
                    .split('@')
                    .next()
                    .filter(|part| !part.is_empty())
                    .unwrap_or("Mock User");
                Ok(session("mock-user", display_name, Some(email)))
            }
        }
    }

    async fn log_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }
}

fn session(user_id: &str, display_name: &str, email: Option<&str>) -> Session {
    Session {
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
        email: email.map(str::to_string),
        token: Uuid::new_v4().to_string(),
    }
}

/// Persists the session blob so a restart stays signed in.
pub fn persist_session(store: &dyn ProfileStore, session: &Session) {
    if let Err(e) = storage::save_json(store, SESSION_KEY, session) {
        tracing::warn!(error = %e, "Failed to persist session");
    }
}

pub fn load_session(store: &dyn ProfileStore) -> Option<Session> {
    storage::load_json(store, SESSION_KEY)
}

pub fn clear_session(store: &dyn ProfileStore) {
    if let Err(e) = store.clear(SESSION_KEY) {
        tracing::warn!(error = %e, "Failed to clear session");
    }
}
