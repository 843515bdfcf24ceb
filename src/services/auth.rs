use std::sync::Arc;
use tracing::{info, warn};

use crate::api::provider::OAuthProvider;
use crate::core::error::{AuthError, StoreError};
use crate::models::user::{UserInfo, UserRecord};
use crate::stores::session_store::{Session, SESSION_STATE, SESSION_USER_ID};
use crate::stores::user_store::UserStore;

/// Login flow on top of the user store and the identity provider
pub struct AuthService {
    users: Arc<UserStore>,
    provider: Arc<dyn OAuthProvider>,
}

impl AuthService {
    pub fn new(users: Arc<UserStore>, provider: Arc<dyn OAuthProvider>) -> Self {
        Self { users, provider }
    }

    pub fn users(&self) -> &Arc<UserStore> {
        &self.users
    }

    /// Start a login: remember a fresh state in the session and hand back
    /// the provider's authorization URL
    pub fn create_login_url(&self, session: &dyn Session, return_url: &str) -> Result<String, AuthError> {
        if !session.get_string(SESSION_USER_ID).is_empty() {
            return Err(AuthError::AlreadyLoggedIn);
        }

        let login = self
            .provider
            .login_url(return_url)
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        session.set(SESSION_STATE, login.state);

        Ok(login.url)
    }

    /// Finish a login started by `create_login_url`
    pub async fn login(&self, session: &dyn Session, code: &str, state: &str) -> Result<UserRecord, AuthError> {
        if !session.get_string(SESSION_USER_ID).is_empty() {
            return Err(AuthError::AlreadyLoggedIn);
        }

        // Consumed here, so a state is good for one attempt
        if !session.take_if(SESSION_STATE, state) {
            warn!("Login attempted with mismatched OAuth state");
            return Err(AuthError::StateMismatch);
        }

        let identity = self
            .provider
            .exchange(code)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let record = match self.users.get_by_id(&identity.id) {
            Ok(_) => {
                self.users.set_token(&identity.id, &identity.token)?;
                self.users.get_by_id(&identity.id)?
            }
            Err(StoreError::NotFound(_)) => {
                info!(user_id = %identity.id, email = %identity.email, "Creating user on first login");
                self.users.create(
                    &identity.id,
                    &identity.token,
                    &identity.email,
                    UserInfo {
                        name: identity.name,
                        avatar: identity.avatar,
                        bio: identity.bio,
                        gender: identity.gender,
                    },
                )?
            }
            Err(e) => return Err(e.into()),
        };

        session.set(SESSION_USER_ID, record.id.to_hex());
        info!(user_id = %record.id, "User logged in");

        Ok(record)
    }

    /// Drop the session's identity
    pub fn logout(&self, session: &dyn Session) -> Result<(), AuthError> {
        let id = session.get_string(SESSION_USER_ID);
        if id.is_empty() {
            return Err(AuthError::NotLoggedIn);
        }

        session.remove(SESSION_USER_ID);
        session.remove(SESSION_STATE);
        info!(user_id = %id, "User logged out");

        Ok(())
    }

    /// Record of the user the session is logged in as
    pub fn current_user(&self, session: &dyn Session) -> Result<UserRecord, AuthError> {
        let id = session.get_string(SESSION_USER_ID);
        if id.is_empty() {
            return Err(AuthError::NotLoggedIn);
        }

        Ok(self.users.get_by_id(&id)?)
    }
}
