// Public API - what other modules can use
pub use handlers::{
    login, login_form, logout, profile, register, register_form, update_profile, HOME_PATH,
    LOGIN_PATH,
};
pub use service::AccountService;

// Internal modules
mod handlers;
mod service;
pub mod types;
mod views;
