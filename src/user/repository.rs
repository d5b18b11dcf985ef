use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for credential store operations
#[async_trait]
pub trait UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
    async fn exists(&self, username: &str) -> Result<bool, AppError>;
    /// Fails with `Conflict` when the username is already taken
    async fn insert(&self, user: &UserModel) -> Result<(), AppError>;
    /// Fails with `NotFound` when no row matches the username
    async fn update(&self, user: &UserModel) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
///
/// Users are lost when the application restarts.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let user_map = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();

        Self {
            users: Mutex::new(user_map),
        }
    }

    pub fn user_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserModel>> {
        // A poisoned map is still structurally valid
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let user = self.lock().get(username).cloned();

        match &user {
            Some(_) => debug!(username = %username, "User found in memory"),
            None => debug!(username = %username, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.lock().contains_key(username))
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.lock();
        if users.contains_key(&user.username) {
            warn!("User already exists in memory");
            return Err(AppError::Conflict("User already exists.".to_string()));
        }
        users.insert(user.username.clone(), user.clone());

        debug!("User inserted in memory");
        Ok(())
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn update(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.lock();
        match users.get_mut(&user.username) {
            Some(existing) => {
                *existing = user.clone();
                debug!("User updated in memory");
                Ok(())
            }
            None => {
                warn!("User not found for update in memory");
                Err(AppError::NotFound("User not found.".to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of the credential store.
///
/// Expects a `users` table with a unique `username` column; schema management
/// happens outside this crate.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT username, password_hash, first_name, last_name, address, phone FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %username, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, username = %username, "Failed to check user existence");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: &UserModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (username, password_hash, first_name, last_name, address, phone) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                warn!("Username taken by a concurrent insert");
                AppError::Conflict("User already exists.".to_string())
            }
            other => {
                warn!(error = %other, "Failed to insert user into database");
                AppError::DatabaseError(other.to_string())
            }
        })?;

        debug!("User inserted in database");
        Ok(())
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn update(&self, user: &UserModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, first_name = $3, last_name = $4, address = $5, phone = $6 WHERE username = $1",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.address)
        .bind(&user.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update user in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!("User not found for update");
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        debug!("User updated in database");
        Ok(())
    }
}
