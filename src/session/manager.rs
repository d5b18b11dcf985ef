use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::context::SessionContext;
use super::repository::SessionStore;
use crate::config::SessionSettings;
use crate::shared::AppError;

/// Moves sessions between the cookie jar and the backing store
pub struct SessionManager {
    store: Arc<dyn SessionStore + Send + Sync>,
    settings: SessionSettings,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore + Send + Sync>, settings: SessionSettings) -> Self {
        Self { store, settings }
    }

    pub fn cookie_name(&self) -> &str {
        &self.settings.cookie_name
    }

    /// Resolves the session named by the request cookie.
    ///
    /// Unknown or idle-expired ids give an empty anonymous context; expired
    /// records are removed on the way.
    #[instrument(skip(self, jar))]
    pub async fn load(&self, jar: &CookieJar) -> Result<SessionContext, AppError> {
        let Some(session_id) = jar.get(&self.settings.cookie_name).map(|c| c.value().to_string())
        else {
            debug!("No session cookie on request");
            return Ok(SessionContext::new());
        };

        let Some(mut model) = self.store.load(&session_id).await? else {
            debug!("Session cookie refers to an unknown session");
            return Ok(SessionContext::new());
        };

        if model.is_expired() {
            info!(expired_at = %model.expires_at(), "Session idle timeout elapsed");
            self.store.delete(&session_id).await?;
            return Ok(SessionContext::new());
        }

        if !self.store.touch(&session_id).await? {
            debug!("Session ended while loading");
            return Ok(SessionContext::new());
        }
        model.touch();

        Ok(SessionContext::from_model(model))
    }

    /// Persists the context and returns the jar with the matching cookie change.
    ///
    /// Persistent cookies are re-issued on every request so the browser copy
    /// slides along with the server-side idle timeout.
    #[instrument(skip(self, session, jar))]
    pub async fn commit(
        &self,
        mut session: SessionContext,
        jar: CookieJar,
    ) -> Result<CookieJar, AppError> {
        if !session.is_modified() {
            return Ok(match session.id() {
                Some(id) if Self::is_persistent(&session) => {
                    jar.add(self.session_cookie(id.to_string(), &session))
                }
                _ => jar,
            });
        }

        if let Some(retired) = session.take_retired_id() {
            self.store.delete(&retired).await?;
        }

        if session.is_empty() {
            if let Some(id) = session.id() {
                self.store.delete(id).await?;
            }
            debug!("Session cleared, expiring cookie");
            return Ok(self.expire_cookie(jar));
        }

        let existing = session.is_persisted();
        let model = session.to_model();
        if existing {
            if !self.store.update(&model).await? {
                info!("Session ended by another request, not restoring it");
                return Ok(self.expire_cookie(jar));
            }
        } else {
            self.store.save(&model).await?;
        }
        debug!(values = model.values.len(), "Session committed");

        Ok(jar.add(self.session_cookie(model.id, &session)))
    }

    fn is_persistent(session: &SessionContext) -> bool {
        session
            .timeout_class()
            .is_some_and(|class| class.persistent_cookie())
    }

    fn session_cookie(&self, id: String, session: &SessionContext) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.settings.cookie_name.clone(), id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

        if Self::is_persistent(session) {
            cookie = cookie.max_age(time::Duration::seconds(
                session.idle_timeout().num_seconds(),
            ));
        }

        cookie.build()
    }

    fn expire_cookie(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((self.settings.cookie_name.clone(), "")).path("/"))
    }
}
