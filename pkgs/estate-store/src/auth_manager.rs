//! Local email/password accounts on top of the users table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::marshal;
use crate::repository::Repository;
use crate::user_store::{NewUser, User, UserPatch, UserStore};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub signed_in_at: DateTime<Utc>,
}

/// Hex SHA-256 of the password salted with the account email.
pub(crate) fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authentication manager
///
/// Holds at most one session. Construct one per client; nothing here is
/// global.
pub struct AuthManager {
    users: UserStore,
    session: RwLock<Option<Session>>,
}

impl AuthManager {
    pub fn new(users: UserStore) -> Self {
        Self {
            users,
            session: RwLock::new(None),
        }
    }

    /// Register a new owner account and sign it in.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<User> {
        info!("Signing up {}", email);
        if password.is_empty() {
            return Err(StoreError::invalid("password", "<empty>"));
        }
        if self.users.get_by_email(email).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "user already exists with email {email}"
            )));
        }

        let draft = NewUser {
            email: email.to_string(),
            full_name: Some(full_name.to_string()),
            is_owner: true,
            ..Default::default()
        };
        let user = self
            .users
            .create_with_password(draft, password_digest(email, password))
            .await?;

        self.start_session(user.clone()).await;
        Ok(user)
    }

    /// Check credentials and start a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.users.get_by_email(email).await? else {
            warn!("Sign-in for unknown email {}", email);
            return Err(StoreError::Authentication);
        };
        if user.password_hash.is_empty() || user.password_hash != password_digest(email, password)
        {
            warn!("Wrong password for {}", email);
            return Err(StoreError::Authentication);
        }

        info!("Signed in {}", user.id);
        self.start_session(user.clone()).await;
        Ok(user)
    }

    pub async fn sign_out(&self) {
        if let Some(session) = self.session.write().await.take() {
            info!("Signed out {}", session.user.id);
        }
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    /// Update a user's profile. The session copy is refreshed when it is
    /// the signed-in user.
    pub async fn update_profile(&self, user_id: &str, patch: UserPatch) -> Result<Option<User>> {
        let updated = self.users.update(user_id, patch).await?;

        if let Some(user) = &updated {
            let mut session = self.session.write().await;
            if let Some(session) = session.as_mut().filter(|s| s.user.id == user.id) {
                debug!("Refreshing session for {}", user.id);
                session.user = user.clone();
            }
        }
        Ok(updated)
    }

    async fn start_session(&self, user: User) {
        *self.session.write().await = Some(Session {
            user,
            signed_in_at: marshal::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = password_digest("a@example.com", "secret");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_salted_by_email() {
        assert_eq!(
            password_digest("A@Example.com ", "secret"),
            password_digest("a@example.com", "secret")
        );
        assert_ne!(
            password_digest("a@example.com", "secret"),
            password_digest("b@example.com", "secret")
        );
        assert_ne!(
            password_digest("a@example.com", "secret"),
            password_digest("a@example.com", "Secret")
        );
    }
}
