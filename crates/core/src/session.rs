//! Visitor identity and color theme.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Email;

/// Key under which the theme is mirrored in a [`PreferenceStore`].
pub const THEME_KEY: &str = "theme";

/// A string-keyed preference mirror (browser storage, a session, ...).
pub trait PreferenceStore {
    /// Read the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a persisted value. Only the exact strings `dark` and `light`
    /// are recognized.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Pick the initial theme.
    ///
    /// A recognized stored value wins. Anything else falls back to the
    /// system preference.
    #[must_use]
    pub fn resolve(stored: Option<&str>, system_prefers_dark: bool) -> Self {
        match stored.and_then(Self::parse) {
            Some(theme) => theme,
            None if system_prefers_dark => Self::Dark,
            None => Self::Light,
        }
    }

    /// Resolve from a preference store.
    #[must_use]
    pub fn load(store: &impl PreferenceStore, system_prefers_dark: bool) -> Self {
        Self::resolve(store.get(THEME_KEY).as_deref(), system_prefers_dark)
    }

    /// Write this theme to a preference store.
    pub fn persist(self, store: &mut impl PreferenceStore) {
        store.set(THEME_KEY, self.as_str());
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Flip the theme and mirror it to `store`. Returns the new theme.
    pub fn toggle(&mut self, store: &mut impl PreferenceStore) -> Self {
        *self = self.toggled();
        self.persist(store);
        *self
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed-in visitor.
///
/// Sign-in is mocked; there is no credential check and no account storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: Email,
    pub name: String,
}

impl User {
    /// Sign in with an email only. The display name comes from the email.
    #[must_use]
    pub fn from_login(email: Email) -> Self {
        let name = email.display_name();
        Self { email, name }
    }

    /// Register with an explicit display name.
    ///
    /// A blank name falls back to the one derived from the email.
    #[must_use]
    pub fn register(email: Email, name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            return Self::from_login(email);
        }
        Self {
            email,
            name: name.to_owned(),
        }
    }
}
