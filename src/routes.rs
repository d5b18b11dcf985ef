use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{account, auth, shared::AppState};

/// Builds the full application router
pub fn build_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/api/whoami", get(auth::whoami))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::bearer_auth,
        ));

    Router::new()
        .route("/", get(|| async { "Account portal" }))
        .route(
            "/Account/Register",
            get(account::register_form).post(account::register),
        )
        .route(
            "/Account/Login",
            get(account::login_form).post(account::login),
        )
        .route("/Account/Profile", get(account::profile))
        .route("/Account/UpdateProfile", post(account::update_profile))
        .route("/Account/Logout", post(account::logout))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
