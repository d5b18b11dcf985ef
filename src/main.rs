use account_portal::{
    auth::password::{Argon2PasswordVerifier, PasswordVerifier, Sha256PasswordVerifier},
    build_router,
    config::{AppConfig, PasswordHasherKind},
    session::{
        cleanup_task::{start_cleanup_task, CleanupConfig},
        repository::{InMemorySessionStore, SessionStore},
    },
    user::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting account portal");

    let config = AppConfig::from_env()?;

    if config.jwt.key.as_deref().map_or(true, str::is_empty) {
        warn!("JWT_SETTINGS_KEY is not set, logins will fail until it is configured");
    }

    let user_repository: Arc<dyn UserRepository + Send + Sync> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            info!("Using PostgreSQL credential store");
            Arc::new(PostgresUserRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory credential store");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let password_verifier: Arc<dyn PasswordVerifier> = match config.password_hasher {
        PasswordHasherKind::Sha256 => Arc::new(Sha256PasswordVerifier),
        PasswordHasherKind::Argon2 => Arc::new(Argon2PasswordVerifier),
    };
    info!(password_hasher = %config.password_hasher, "Password hasher selected");

    let session_store: Arc<dyn SessionStore + Send + Sync> = Arc::new(InMemorySessionStore::new());

    tokio::spawn(start_cleanup_task(
        Arc::clone(&session_store),
        CleanupConfig {
            cleanup_interval: config.session.cleanup_interval,
        },
    ));

    let app_state = AppState::new(
        user_repository,
        session_store,
        password_verifier,
        config.jwt.clone(),
        config.session.clone(),
    );

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
