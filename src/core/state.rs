// Application state (AppState)

use crate::api::provider::OAuthProvider;
use crate::core::config::Config;
use crate::services::auth::AuthService;
use crate::stores::kv::KvStore;
use crate::stores::session_store::SessionRegistry;
use crate::stores::user_store::UserStore;
use std::sync::Arc;

/// Shared application state
///
/// Storage and the identity provider are injected so tests can swap in
/// in-memory doubles.
#[derive(Clone)]
pub struct AppState {
    /// Durable user records
    pub users: Arc<UserStore>,

    /// Login flow
    pub auth: Arc<AuthService>,

    /// Cookie-keyed sessions
    pub sessions: Arc<SessionRegistry>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, kv: Arc<dyn KvStore>, provider: Arc<dyn OAuthProvider>) -> Self {
        let config = Arc::new(config);
        let users = Arc::new(UserStore::new(kv));
        let auth = Arc::new(AuthService::new(Arc::clone(&users), provider));
        let sessions = Arc::new(SessionRegistry::new(config.session.ttl));

        Self {
            users,
            auth,
            sessions,
            config,
        }
    }
}
