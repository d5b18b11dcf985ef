use std::sync::{Arc, Mutex};

use axum::Router;

use account_portal::{
    auth::password::Sha256PasswordVerifier,
    build_router,
    session::repository::InMemorySessionStore,
    user::InMemoryUserRepository,
    AppState, JwtSettings, SessionSettings, TokenIssuer,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SIGNING_KEY: &str = "integration-signing-key-0123456789";
pub const TEST_ISSUER: &str = "account-portal";
pub const TEST_AUDIENCE: &str = "account-portal-clients";

/// A router plus a cookie-carrying "browser" and handles on the backing stores
pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pub cookie: Mutex<Option<String>>,
}

pub struct TestSetupBuilder {
    jwt_settings: JwtSettings,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            jwt_settings: JwtSettings {
                key: Some(TEST_SIGNING_KEY.to_string()),
                issuer: Some(TEST_ISSUER.to_string()),
                audience: Some(TEST_AUDIENCE.to_string()),
            },
        }
    }

    pub fn without_signing_key(mut self) -> Self {
        self.jwt_settings.key = None;
        self
    }

    pub fn build(self) -> TestSetup {
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionStore::new());

        let state = AppState::new(
            users.clone(),
            sessions.clone(),
            Arc::new(Sha256PasswordVerifier),
            self.jwt_settings,
            SessionSettings::default(),
        );

        TestSetup {
            app: build_router(state.clone()),
            state,
            users,
            sessions,
            cookie: Mutex::new(None),
        }
    }
}

impl TestSetup {
    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.state.token_issuer
    }

    pub fn cookie_name(&self) -> String {
        self.state.session_manager.cookie_name().to_string()
    }

    /// Current session id held by the test browser
    pub fn session_id(&self) -> Option<String> {
        self.cookie
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|pair| pair.split_once('=').map(|(_, id)| id.to_string()))
    }
}
