//! Types stored in the visitor's session.

pub mod session;

pub use session::{SessionPreferences, keys as session_keys, load, store};
