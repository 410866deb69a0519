//! The cart ledger.
//!
//! A quantity-keyed collection of catalog products. The ledger holds at most
//! one entry per product id and never lets a quantity drop below one: merging
//! an already-present product bumps its quantity, and taking an item out of
//! the cart is always an explicit [`CartLedger::remove`].
//!
//! Lookups by id that find nothing are no-ops; no operation here fails.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::observer::{ObserverError, Observers, SubscriptionId};
use crate::types::{Price, ProductId};

/// A product in the cart with its quantity (always at least 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Change notifications emitted by [`CartLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product entered the cart.
    EntryAdded { id: ProductId, quantity: u32 },
    /// An existing entry's quantity changed.
    QuantityChanged { id: ProductId, quantity: u32 },
    /// An entry was removed.
    EntryRemoved { id: ProductId },
    /// The cart was emptied.
    Cleared,
    /// The cart drawer should be shown.
    OpenRequested,
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartLedger {
    entries: Vec<CartEntry>,
    #[serde(skip)]
    observers: Observers<CartEvent>,
}

impl CartLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view to be told about every change.
    ///
    /// # Errors
    ///
    /// Returns an error if the observer registry is full.
    pub fn subscribe<F>(&mut self, callback: F) -> Result<SubscriptionId, ObserverError>
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Add `quantity` of `product`, merging with an existing entry.
    ///
    /// A quantity of zero is treated as one. Always requests the cart view.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);
        self.merge(product, quantity);
        self.observers.notify(&CartEvent::OpenRequested);
    }

    /// Add every product in `products` once.
    ///
    /// Existing entries go up by exactly one and new entries start at one,
    /// no matter how often a product repeats in `products`. Requests the
    /// cart view once.
    pub fn add_all<'a, I>(&mut self, products: I)
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut seen = HashSet::new();
        for product in products {
            if seen.insert(product.id.clone()) {
                self.merge(product, 1);
            }
        }
        self.observers.notify(&CartEvent::OpenRequested);
    }

    /// Change a quantity by `delta`, never going below one.
    ///
    /// Unknown ids are ignored.
    pub fn adjust_quantity(&mut self, id: &ProductId, delta: i64) {
        let Some(entry) = self.entries.iter_mut().find(|e| &e.product.id == id) else {
            return;
        };

        let adjusted = i64::from(entry.quantity).saturating_add(delta).max(1);
        let quantity = u32::try_from(adjusted).unwrap_or(u32::MAX);
        if quantity == entry.quantity {
            return;
        }

        entry.quantity = quantity;
        self.observers.notify(&CartEvent::QuantityChanged {
            id: id.clone(),
            quantity,
        });
    }

    /// Remove an entry regardless of its quantity.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.observers
                .notify(&CartEvent::EntryRemoved { id: id.clone() });
        }
        removed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.observers.notify(&CartEvent::Cleared);
    }

    /// Sum of price × quantity over all entries.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Entries in the order products were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge(&mut self, product: &Product, quantity: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.product.id == product.id) {
            entry.quantity = entry.quantity.saturating_add(quantity);
            let event = CartEvent::QuantityChanged {
                id: product.id.clone(),
                quantity: entry.quantity,
            };
            self.observers.notify(&event);
        } else {
            self.entries.push(CartEntry {
                product: product.clone(),
                quantity,
            });
            self.observers.notify(&CartEvent::EntryAdded {
                id: product.id.clone(),
                quantity,
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::catalog::ClothingType;
    use crate::catalog::fixtures::product;

    fn recorded(ledger: &mut CartLedger) -> Arc<Mutex<Vec<CartEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        ledger
            .subscribe(move |e| sink.lock().unwrap().push(e.clone()))
            .unwrap();
        events
    }

    fn quantity(ledger: &CartLedger, id: &str) -> Option<u32> {
        ledger.get(&ProductId::new(id)).map(|e| e.quantity)
    }

    #[test]
    fn test_add_twice_merges() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();

        ledger.add(&tee, 1);
        ledger.add(&tee, 1);

        assert_eq!(ledger.len(), 1);
        assert_eq!(quantity(&ledger, "t1"), Some(2));
    }

    #[test]
    fn test_add_with_quantity() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();

        ledger.add(&tee, 3);
        ledger.add(&tee, 2);
        ledger.add(&tee, 0);

        assert_eq!(quantity(&ledger, "t1"), Some(6));
    }

    #[test]
    fn test_add_always_requests_cart_view() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();
        let events = recorded(&mut ledger);

        ledger.add(&tee, 1);
        ledger.add(&tee, 1);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                CartEvent::EntryAdded {
                    id: ProductId::new("t1"),
                    quantity: 1
                },
                CartEvent::OpenRequested,
                CartEvent::QuantityChanged {
                    id: ProductId::new("t1"),
                    quantity: 2
                },
                CartEvent::OpenRequested,
            ]
        );
    }

    #[test]
    fn test_add_all_collapses_duplicates_within_call() {
        let x = product("x", ClothingType::Top, 100);
        let y = product("y", ClothingType::Bottom, 200);
        let mut ledger = CartLedger::new();

        ledger.add_all([&x, &x, &y]);

        assert_eq!(ledger.len(), 2);
        assert_eq!(quantity(&ledger, "x"), Some(1));
        assert_eq!(quantity(&ledger, "y"), Some(1));
    }

    #[test]
    fn test_add_all_increments_existing_by_one() {
        let x = product("x", ClothingType::Top, 100);
        let y = product("y", ClothingType::Bottom, 200);
        let mut ledger = CartLedger::new();
        ledger.add(&x, 4);

        ledger.add_all([&x, &y, &x]);

        assert_eq!(quantity(&ledger, "x"), Some(5));
        assert_eq!(quantity(&ledger, "y"), Some(1));
    }

    #[test]
    fn test_add_all_requests_cart_view_once() {
        let x = product("x", ClothingType::Top, 100);
        let y = product("y", ClothingType::Bottom, 200);
        let mut ledger = CartLedger::new();
        let events = recorded(&mut ledger);

        ledger.add_all([&x, &y]);

        let opens = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == CartEvent::OpenRequested)
            .count();
        assert_eq!(opens, 1);
    }

    #[test]
    fn test_adjust_quantity_floors_at_one() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();
        ledger.add(&tee, 3);

        ledger.adjust_quantity(&tee.id, -100);

        assert_eq!(quantity(&ledger, "t1"), Some(1));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_adjust_quantity_up() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();
        ledger.add(&tee, 1);

        ledger.adjust_quantity(&tee.id, 1);

        assert_eq!(quantity(&ledger, "t1"), Some(2));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();
        ledger.add(&tee, 2);
        let events = recorded(&mut ledger);

        ledger.adjust_quantity(&ProductId::new("nope"), 5);
        assert!(!ledger.remove(&ProductId::new("nope")));

        assert_eq!(quantity(&ledger, "t1"), Some(2));
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_remove_ignores_quantity() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();
        ledger.add(&tee, 7);

        assert!(ledger.remove(&tee.id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_total_and_item_count() {
        let tee = product("t1", ClothingType::Top, 890);
        let jeans = product("b1", ClothingType::Bottom, 2100);
        let mut ledger = CartLedger::new();
        ledger.add(&tee, 2);
        ledger.add(&jeans, 1);

        assert_eq!(ledger.total(), Price::new(3880));
        assert_eq!(ledger.item_count(), 3);

        ledger.clear();
        assert_eq!(ledger.total(), Price::ZERO);
        assert_eq!(ledger.item_count(), 0);
    }

    #[test]
    fn test_observers_are_not_serialized() {
        let tee = product("t1", ClothingType::Top, 890);
        let mut ledger = CartLedger::new();
        let _events = recorded(&mut ledger);
        ledger.add(&tee, 1);

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: CartLedger = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.entries(), ledger.entries());
        assert!(restored.observers.is_empty());
    }
}
