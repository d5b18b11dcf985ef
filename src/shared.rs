use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::account::AccountService;
use crate::auth::{password::PasswordVerifier, token::TokenIssuer};
use crate::config::{JwtSettings, SessionSettings};
use crate::session::{manager::SessionManager, repository::SessionStore};
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub session_store: Arc<dyn SessionStore + Send + Sync>,
    pub session_manager: Arc<SessionManager>,
    pub account_service: Arc<AccountService>,
    pub token_issuer: TokenIssuer,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        session_store: Arc<dyn SessionStore + Send + Sync>,
        password_verifier: Arc<dyn PasswordVerifier>,
        jwt_settings: JwtSettings,
        session_settings: SessionSettings,
    ) -> Self {
        let token_issuer = TokenIssuer::new(jwt_settings);
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&session_store),
            session_settings,
        ));
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&user_repository),
            password_verifier,
            token_issuer.clone(),
        ));

        Self {
            user_repository,
            session_store,
            session_manager,
            account_service,
            token_issuer,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Message shown to the client, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Unauthenticated(msg)
            | AppError::NotFound(msg)
            | AppError::JwtError(msg) => msg.clone(),
            AppError::Configuration(_) | AppError::DatabaseError(_) | AppError::Internal => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.message();

        // Credential failures are answered in plain text
        match self {
            AppError::Conflict(_) => return (StatusCode::BAD_REQUEST, message).into_response(),
            AppError::Unauthorized(_) => {
                return (StatusCode::UNAUTHORIZED, message).into_response()
            }
            _ => {}
        }

        let status = match &self {
            AppError::Unauthenticated(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(detail) => {
                error!(detail = %detail, "Request aborted by configuration error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::DatabaseError(detail) => {
                error!(detail = %detail, "Request aborted by database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::auth::password::Sha256PasswordVerifier;
    use crate::session::repository::InMemorySessionStore;
    use crate::user::repository::InMemoryUserRepository;

    pub const TEST_SIGNING_KEY: &str = "test-signing-key-0123456789abcdef";

    pub fn test_jwt_settings() -> JwtSettings {
        JwtSettings {
            key: Some(TEST_SIGNING_KEY.to_string()),
            issuer: Some("account-portal-tests".to_string()),
            audience: Some("account-portal-clients".to_string()),
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        user_repository: Option<Arc<dyn UserRepository + Send + Sync>>,
        session_store: Option<Arc<dyn SessionStore + Send + Sync>>,
        jwt_settings: JwtSettings,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                user_repository: None,
                session_store: None,
                jwt_settings: test_jwt_settings(),
            }
        }

        pub fn with_user_repository(
            mut self,
            repo: Arc<dyn UserRepository + Send + Sync>,
        ) -> Self {
            self.user_repository = Some(repo);
            self
        }

        pub fn with_session_store(mut self, store: Arc<dyn SessionStore + Send + Sync>) -> Self {
            self.session_store = Some(store);
            self
        }

        pub fn with_jwt_settings(mut self, settings: JwtSettings) -> Self {
            self.jwt_settings = settings;
            self
        }

        pub fn build(self) -> AppState {
            AppState::new(
                self.user_repository
                    .unwrap_or_else(|| Arc::new(InMemoryUserRepository::new())),
                self.session_store
                    .unwrap_or_else(|| Arc::new(InMemorySessionStore::new())),
                Arc::new(Sha256PasswordVerifier),
                self.jwt_settings,
                SessionSettings::default(),
            )
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    #[test]
    fn test_error_messages_hide_internal_details() {
        assert_eq!(
            AppError::Conflict("User already exists.".to_string()).message(),
            "User already exists."
        );
        assert_eq!(
            AppError::DatabaseError("connection refused".to_string()).message(),
            "Internal server error"
        );
        assert_eq!(
            AppError::Configuration("JWT Key is missing".to_string()).message(),
            "Internal server error"
        );
    }

    #[tokio::test]
    async fn test_conflict_is_plain_text_bad_request() {
        let response = AppError::Conflict("User already exists.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"User already exists.");
    }

    #[tokio::test]
    async fn test_configuration_error_is_internal_server_error() {
        let response = AppError::Configuration("missing key".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
