//! VIRA Core - storefront state engine.
//!
//! This crate holds everything the storefront knows about products, carts and
//! outfits, independent of how it is served:
//! - `vira-storefront` - the HTTP service that keeps one copy of this state per
//!   visitor session
//! - `vira-integration-tests` - end-to-end tests against that service
//!
//! # Architecture
//!
//! The core crate contains only types, pure derivations and in-memory state
//! containers - no I/O, no HTTP clients, no clocks. Anything that waits or talks
//! to the network lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`catalog`] - The read-only product catalog and its closed enums
//! - [`filter`] - Declarative filter state, facets and the listing derivation
//! - [`cart`] - The quantity-keyed cart ledger
//! - [`outfit`] - The per-slot outfit composer
//! - [`wizard`] - The configurator step machine
//! - [`session`] - Visitor identity and color theme
//! - [`observer`] - Bounded change-notification registry
//! - [`checkout`] - Order pricing (subtotal, shipping, total)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod filter;
pub mod observer;
pub mod outfit;
pub mod session;
pub mod types;
pub mod wizard;

pub use cart::{CartEntry, CartEvent, CartLedger};
pub use catalog::{Catalog, CatalogError, Category, ClothingType, Color, OutfitSlot, Product};
pub use checkout::{DeliveryMethod, OrderPricing, PaymentMethod};
pub use filter::{Facets, FilterState, PriceRange};
pub use observer::{ObserverError, Observers, SubscriptionId};
pub use outfit::{Outfit, OutfitComposer, OutfitEvent, SlotSelection};
pub use session::{PreferenceStore, THEME_KEY, Theme, User};
pub use types::*;
pub use wizard::{Wizard, WizardStep};
