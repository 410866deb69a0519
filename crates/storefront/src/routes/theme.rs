//! Theme route handlers.
//!
//! The theme is mirrored in the session. Without a stored value the
//! `Sec-CH-Prefers-Color-Scheme` client hint decides; every response asks
//! the browser to keep sending that hint.

use axum::{
    Json,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;
use vira_core::Theme;

use crate::error::Result;
use crate::models::SessionPreferences;

/// Client hint carrying the operating system color scheme.
pub const PREFERS_COLOR_SCHEME: &str = "sec-ch-prefers-color-scheme";

/// Theme payload.
#[derive(Debug, Serialize)]
pub struct ThemeView {
    pub theme: Theme,
}

fn system_prefers_dark(headers: &HeaderMap) -> bool {
    headers
        .get(PREFERS_COLOR_SCHEME)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().trim_matches('"').eq_ignore_ascii_case("dark"))
}

fn respond(theme: Theme) -> Response {
    (
        [
            (
                HeaderName::from_static("accept-ch"),
                HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
            ),
            (
                HeaderName::from_static("vary"),
                HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
            ),
        ],
        Json(ThemeView { theme }),
    )
        .into_response()
}

/// Current theme.
#[instrument(skip_all)]
pub async fn show(session: Session, headers: HeaderMap) -> Result<Response> {
    let prefs = SessionPreferences::load(&session).await?;
    let theme = Theme::load(&prefs, system_prefers_dark(&headers));
    Ok(respond(theme))
}

/// Flip the theme and remember the choice.
#[instrument(skip_all)]
pub async fn toggle(session: Session, headers: HeaderMap) -> Result<Response> {
    let mut prefs = SessionPreferences::load(&session).await?;
    let mut theme = Theme::load(&prefs, system_prefers_dark(&headers));
    theme.toggle(&mut prefs);
    prefs.save(&session).await?;

    tracing::debug!(theme = %theme, "Theme toggled");
    Ok(respond(theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_preference_from_client_hint() {
        let mut headers = HeaderMap::new();
        assert!(!system_prefers_dark(&headers));

        headers.insert(PREFERS_COLOR_SCHEME, HeaderValue::from_static("\"dark\""));
        assert!(system_prefers_dark(&headers));

        headers.insert(PREFERS_COLOR_SCHEME, HeaderValue::from_static("light"));
        assert!(!system_prefers_dark(&headers));
    }
}
