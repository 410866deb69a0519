//! Session-related types.
//!
//! Everything a visitor accumulates (cart, outfit in progress, wizard step,
//! identity, theme) lives in their `tower-sessions` session under the keys
//! below. Missing entries, and entries that no longer deserialize into their
//! type, start from their defaults. Store failures are still errors.

use serde::{Serialize, de::DeserializeOwned};
use tower_sessions::Session;
use vira_core::{PreferenceStore, THEME_KEY};

/// Session keys for visitor state.
pub mod keys {
    /// Key for the cart ledger.
    pub const CART: &str = "cart";

    /// Key for the outfit being composed in the configurator.
    pub const OUTFIT: &str = "outfit";

    /// Key for the configurator step.
    pub const WIZARD: &str = "wizard";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the mirrored theme preference.
    pub const THEME: &str = vira_core::THEME_KEY;
}

/// Load a value from the session, or its default when absent or unreadable.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load<T>(session: &Session, key: &str) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(key, error = %e, "Discarding unreadable session entry");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Write a value to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn store<T>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + Send + Sync,
{
    session.insert(key, value).await
}

/// A snapshot of session-backed preferences.
///
/// [`PreferenceStore`] is synchronous; this type is loaded from the session
/// up front, mutated in memory and written back with [`SessionPreferences::save`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPreferences {
    theme: Option<String>,
}

impl SessionPreferences {
    /// Read the preferences from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(Self {
            theme: load::<Option<String>>(session, keys::THEME).await?,
        })
    }

    /// Write the preferences back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        if let Some(theme) = &self.theme {
            session.insert(keys::THEME, theme).await?;
        }
        Ok(())
    }
}

impl PreferenceStore for SessionPreferences {
    fn get(&self, key: &str) -> Option<String> {
        (key == THEME_KEY).then(|| self.theme.clone()).flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if key == THEME_KEY {
            self.theme = Some(value.to_owned());
        }
    }
}
