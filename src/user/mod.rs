pub use models::{ProfileFields, UserModel};
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

pub mod models;
pub mod repository;
