//! Process-wide authentication state shared by every command.

use crate::notify::redact_log_details;
use crate::session::TokenStore;
use issuehub_api::{HubClient, HubError, User};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

/// Snapshot of the current authentication state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
        }
    }
}

/// Holds the signed-in user and token, keeps the persisted token and the API client's bearer token in step.
#[derive(Clone)]
pub struct AuthStore {
    client: HubClient,
    tokens: Arc<dyn TokenStore>,
    state: Arc<Mutex<AuthState>>,
}

impl AuthStore {
    pub fn new(client: HubClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            tokens,
            state: Arc::new(Mutex::new(AuthState::default())),
        }
    }

    pub fn client(&self) -> &HubClient {
        &self.client
    }

    /// Returns a cloned snapshot of the current state.
    pub fn snapshot(&self) -> AuthState {
        self.lock().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated
    }

    /// Exchanges credentials for a token, persists it, then loads the profile.
    ///
    /// Fails without touching state when the token cannot be persisted. A failed
    /// profile fetch is returned to the caller but the session stays
    /// authenticated, without a user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, HubError> {
        let response = self.client.login(email, password).await?;
        let token = response.access_token;

        self.tokens.save(&token).map_err(HubError::Other)?;
        self.client.set_token(token.clone());
        {
            let mut state = self.lock();
            state.token = Some(token);
            state.is_authenticated = true;
            state.is_loading = false;
        }

        let user = self.client.me().await?;
        self.lock().user = Some(user.clone());
        info!("Signed in as user {}", user.id);
        Ok(user)
    }

    /// Creates an account. Does not sign in.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, HubError> {
        self.client.signup(name, email, password).await
    }

    /// Drops the persisted token and resets the state.
    pub fn logout(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!("Failed to remove persisted session: {}", err);
        }
        self.client.clear_token();
        *self.lock() = AuthState {
            is_loading: false,
            ..AuthState::default()
        };
    }

    /// Restores a session from the persisted token.
    ///
    /// A token the API rejects (or any failure while checking it) is removed.
    pub async fn check_auth(&self) -> AuthState {
        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                warn!("Failed to read persisted session: {}", err);
                None
            }
        };

        let Some(token) = token else {
            debug!("No persisted session");
            self.client.clear_token();
            let mut state = self.lock();
            state.is_authenticated = false;
            state.is_loading = false;
            return state.clone();
        };

        self.client.set_token(token.clone());
        match self.client.me().await {
            Ok(user) => {
                debug!("Restored session for user {}", user.id);
                let mut state = self.lock();
                *state = AuthState {
                    user: Some(user),
                    token: Some(token),
                    is_authenticated: true,
                    is_loading: false,
                };
                state.clone()
            }
            Err(err) => {
                debug!(
                    "Persisted session rejected: {}",
                    redact_log_details(&err.to_string())
                );
                self.logout();
                self.snapshot()
            }
        }
    }

    /// Returns the signed-in user or the message that sends the user to login.
    pub fn require_user(&self) -> Result<User, String> {
        let state = self.lock();
        match (&state.user, state.is_authenticated) {
            (Some(user), true) => Ok(user.clone()),
            _ => Err("You are not logged in. Run `issuehub login` first.".to_string()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AuthState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
