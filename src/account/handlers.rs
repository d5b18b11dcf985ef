use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use super::{
    types::{LoginRequest, RegisterRequest, UpdateProfileRequest, UpdateProfileResponse},
    views,
};
use crate::shared::{AppError, AppState};

pub const LOGIN_PATH: &str = "/Account/Login";
pub const HOME_PATH: &str = "/";

/// GET /Account/Register
pub async fn register_form() -> Html<&'static str> {
    Html(views::REGISTER_FORM)
}

/// POST /Account/Register
/// Creates the user and sends the browser on to the login page
#[instrument(name = "register", skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    Form(request): Form<RegisterRequest>,
) -> Result<Redirect, AppError> {
    state.account_service.register(request).await?;

    Ok(Redirect::to(LOGIN_PATH))
}

/// GET /Account/Login
pub async fn login_form() -> Html<&'static str> {
    Html(views::LOGIN_FORM)
}

/// POST /Account/Login
/// Signs the session in and redirects home
#[instrument(name = "login", skip(state, jar, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> Result<(CookieJar, Redirect), AppError> {
    let mut session = state.session_manager.load(&jar).await?;

    state.account_service.login(&mut session, request).await?;

    let jar = state.session_manager.commit(session, jar).await?;
    Ok((jar, Redirect::to(HOME_PATH)))
}

/// GET /Account/Profile
/// Returns the profile as JSON, or redirects anonymous sessions to the login page
#[instrument(name = "profile", skip(state, jar))]
pub async fn profile(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let mut session = state.session_manager.load(&jar).await?;

    match state.account_service.profile(&mut session).await {
        Ok(view) => {
            let jar = state.session_manager.commit(session, jar).await?;
            Ok((jar, Json(view)).into_response())
        }
        Err(AppError::Unauthenticated(_)) => {
            info!("Anonymous profile request, redirecting to login");
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(AppError::NotFound(_)) => {
            warn!("Session user no longer exists, signing out");
            session.clear();
            let jar = state.session_manager.commit(session, jar).await?;
            Ok((jar, Redirect::to(LOGIN_PATH)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /Account/UpdateProfile
/// Always answers 200 with `{success, message?}` unless the store fails
#[instrument(name = "update_profile", skip(state, jar, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UpdateProfileResponse>), AppError> {
    let mut session = state.session_manager.load(&jar).await?;

    let response = match body {
        Ok(Json(request)) => match state
            .account_service
            .update_profile(&mut session, request.into())
            .await
        {
            Ok(_) => UpdateProfileResponse::ok(),
            Err(e @ (AppError::Unauthenticated(_) | AppError::NotFound(_))) => {
                UpdateProfileResponse::failed(e.message())
            }
            Err(e) => return Err(e),
        },
        Err(_) if !session.is_authenticated() => {
            warn!("Profile update without a signed-in user");
            UpdateProfileResponse::failed(
                AppError::Unauthenticated("User is not logged in.".to_string()).message(),
            )
        }
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable profile update body");
            UpdateProfileResponse::failed(rejection.body_text())
        }
    };

    let jar = state.session_manager.commit(session, jar).await?;
    Ok((jar, Json(response)))
}

/// POST /Account/Logout
#[instrument(name = "logout", skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let mut session = state.session_manager.load(&jar).await?;

    state.account_service.logout(&mut session);

    let jar = state.session_manager.commit(session, jar).await?;
    Ok((jar, Redirect::to(LOGIN_PATH)))
}
