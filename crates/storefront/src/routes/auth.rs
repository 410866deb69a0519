//! Authentication route handlers.
//!
//! Sign-in and registration are mocked. Any well-formed email is accepted
//! after a short artificial delay and the visitor is remembered in the
//! session. Passwords are accepted but never checked or stored.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use vira_core::{Email, User};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw.trim()).map_err(|_| AppError::BadRequest("Invalid email address".to_string()))
}

/// Sign in.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<User>> {
    let email = parse_email(&form.email)?;

    tokio::time::sleep(state.config().login_delay).await;

    let user = User::from_login(email);
    set_current_user(&session, &user).await?;
    set_sentry_user(user.email.as_str());
    tracing::info!("User signed in");

    Ok(Json(user))
}

/// Create an account and sign in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<Json<User>> {
    let email = parse_email(&form.email)?;

    tokio::time::sleep(state.config().login_delay).await;

    let user = User::register(email, &form.name);
    set_current_user(&session, &user).await?;
    set_sentry_user(user.email.as_str());
    tracing::info!("User registered");

    Ok(Json(user))
}

/// Sign out. The cart and outfit stay with the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in visitor, or `null`.
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<User>> {
    Json(user)
}
