// Public API - what other modules can use
pub use handlers::whoami;
pub use middleware::bearer_auth;
pub use types::TokenClaims;

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod token;
pub mod types;
