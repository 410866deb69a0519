//! External collaborators of the storefront.
//!
//! # Services
//!
//! - `suggestion` - Outfit suggestions from the Gemini API

pub mod suggestion;

pub use suggestion::{
    DisabledSuggester, GeminiSuggester, OutfitSuggester, Suggestion, SuggestionError,
    suggest_or_empty,
};
