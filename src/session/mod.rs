// Public API - what other modules can use
pub use context::SessionContext;
pub use manager::SessionManager;
pub use types::{keys, TimeoutClass};

// Internal modules
pub mod cleanup_task;
mod context;
pub mod manager;
pub mod models;
pub mod repository;
mod types;
