use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::types::{LoginRequest, ProfileView, RegisterRequest};
use crate::auth::{password::PasswordVerifier, token::TokenIssuer};
use crate::session::{keys, SessionContext, TimeoutClass};
use crate::shared::AppError;
use crate::user::{ProfileFields, UserModel, UserRepository};

const PROFILE_KEYS: [&str; 4] = [
    keys::FIRST_NAME,
    keys::LAST_NAME,
    keys::ADDRESS,
    keys::PHONE,
];

/// Register, login, profile and logout over a caller-supplied session.
///
/// The only authorization check is the presence of a username in the
/// session. The token stored at login is not re-validated here; it is only
/// checked by the bearer middleware.
pub struct AccountService {
    users: Arc<dyn UserRepository + Send + Sync>,
    verifier: Arc<dyn PasswordVerifier>,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository + Send + Sync>,
        verifier: Arc<dyn PasswordVerifier>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            verifier,
            tokens,
        }
    }

    /// Creates a user. Does not sign the user in.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserModel, AppError> {
        if self.users.exists(&request.username).await? {
            warn!("Registration rejected, username taken");
            return Err(AppError::Conflict("User already exists.".to_string()));
        }

        let password_hash = self.verifier.hash(&request.password)?;
        let user = UserModel::new(request.username.clone(), password_hash)
            .with_profile(request.profile());

        self.users.insert(&user).await?;

        info!("User registered");
        Ok(user)
    }

    /// Verifies credentials, issues a token and signs the session in.
    ///
    /// Returns the issued token.
    #[instrument(skip(self, session, request), fields(username = %request.username))]
    pub async fn login(
        &self,
        session: &mut SessionContext,
        request: LoginRequest,
    ) -> Result<String, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials.".to_string());

        let Some(user) = self.users.find_by_username(&request.username).await? else {
            warn!("Login rejected, unknown user");
            return Err(invalid());
        };

        if !self.verifier.verify(&request.password, &user.password_hash)? {
            warn!("Login rejected, password mismatch");
            return Err(invalid());
        }

        let token = self.tokens.issue(&user.username)?;
        let timeout = TimeoutClass::from_remember_me(request.remember_me());

        session.renew_id();
        session.clear();
        session.set(keys::AUTH_TOKEN, token.clone());
        session.set(keys::USERNAME, user.username.clone());
        write_profile(session, &user.profile());
        session.set_timeout(timeout);

        info!(timeout = %timeout, "User signed in");
        Ok(token)
    }

    /// Profile for the signed-in user, read from the session.
    ///
    /// Missing fields are filled from the credential store and cached in
    /// the session.
    #[instrument(skip(self, session))]
    pub async fn profile(&self, session: &mut SessionContext) -> Result<ProfileView, AppError> {
        let username = session
            .username()
            .map(str::to_string)
            .ok_or_else(|| AppError::Unauthenticated("User is not logged in.".to_string()))?;

        if PROFILE_KEYS.iter().any(|key| session.get(key).is_none()) {
            let user = self
                .users
                .find_by_username(&username)
                .await?
                .ok_or_else(|| {
                    warn!(username = %username, "Session refers to a missing user");
                    AppError::NotFound("User not found.".to_string())
                })?;

            let stored = user.profile();
            for (key, value) in PROFILE_KEYS.iter().zip(profile_values(&stored)) {
                if session.get(key).is_none() {
                    session.set(key, value.unwrap_or_default());
                }
            }
        }

        Ok(view_from_session(session, username))
    }

    /// Writes the new profile to the credential store and the session
    #[instrument(skip(self, session, profile))]
    pub async fn update_profile(
        &self,
        session: &mut SessionContext,
        profile: ProfileFields,
    ) -> Result<ProfileView, AppError> {
        let Some(username) = session.username().map(str::to_string) else {
            warn!("Profile update without a signed-in user");
            return Err(AppError::Unauthenticated(
                "User is not logged in.".to_string(),
            ));
        };

        let mut user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                warn!(username = %username, "Profile update for a missing user");
                AppError::NotFound("User not found.".to_string())
            })?;

        user.apply_profile(profile);
        self.users.update(&user).await?;
        write_profile(session, &user.profile());

        info!(username = %username, "Profile updated");
        Ok(view_from_session(session, username))
    }

    #[instrument(skip(self, session))]
    pub fn logout(&self, session: &mut SessionContext) {
        if let Some(username) = session.username() {
            info!(username = %username, "User signed out");
        }
        session.clear();
    }
}

fn profile_values(profile: &ProfileFields) -> [Option<String>; 4] {
    [
        profile.first_name.clone(),
        profile.last_name.clone(),
        profile.address.clone(),
        profile.phone.clone(),
    ]
}

fn write_profile(session: &mut SessionContext, profile: &ProfileFields) {
    for (key, value) in PROFILE_KEYS.iter().zip(profile_values(profile)) {
        match value {
            Some(value) => session.set(key, value),
            None => {
                session.remove(key);
            }
        }
    }
}

fn view_from_session(session: &SessionContext, username: String) -> ProfileView {
    let field = |key: &str| session.get(key).unwrap_or_default().to_string();

    ProfileView {
        username,
        first_name: field(keys::FIRST_NAME),
        last_name: field(keys::LAST_NAME),
        address: field(keys::ADDRESS),
        phone: field(keys::PHONE),
    }
}
