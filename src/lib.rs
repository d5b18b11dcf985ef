// Library crate for the account portal
// This file exposes the public API for the binary and integration tests

pub mod account;
pub mod auth;
pub mod config;
pub mod routes;
pub mod session;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use account::AccountService;
pub use auth::{token::TokenIssuer, TokenClaims};
pub use config::{AppConfig, JwtSettings, SessionSettings};
pub use routes::build_router;
pub use session::{SessionContext, SessionManager, TimeoutClass};
pub use shared::{AppError, AppState};
