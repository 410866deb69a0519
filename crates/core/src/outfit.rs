//! The outfit composer.
//!
//! An outfit holds at most one product per [`OutfitSlot`]. Picking a product
//! for an occupied slot replaces the previous pick. The composer knows nothing
//! about the cart: [`OutfitComposer::commit`] hands back the picked products
//! and the caller decides what to do with them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, OutfitSlot, Product};
use crate::observer::{ObserverError, Observers, SubscriptionId};
use crate::types::{Price, ProductId};

/// One optional product per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub headwear: Option<Product>,
    pub top: Option<Product>,
    pub bottom: Option<Product>,
    pub shoes: Option<Product>,
}

impl Outfit {
    #[must_use]
    pub fn get(&self, slot: OutfitSlot) -> Option<&Product> {
        match slot {
            OutfitSlot::Headwear => self.headwear.as_ref(),
            OutfitSlot::Top => self.top.as_ref(),
            OutfitSlot::Bottom => self.bottom.as_ref(),
            OutfitSlot::Shoes => self.shoes.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: OutfitSlot) -> &mut Option<Product> {
        match slot {
            OutfitSlot::Headwear => &mut self.headwear,
            OutfitSlot::Top => &mut self.top,
            OutfitSlot::Bottom => &mut self.bottom,
            OutfitSlot::Shoes => &mut self.shoes,
        }
    }

    /// Picked products, head to toe.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        OutfitSlot::ALL.into_iter().filter_map(|slot| self.get(slot))
    }

    /// Sum of the picked products' prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.products().map(|p| p.price).sum()
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.products().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products().next().is_none()
    }
}

/// Outcome of [`OutfitComposer::select_for_slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSelection {
    /// The product now occupies `slot`; `replaced` is the previous occupant.
    Selected {
        slot: OutfitSlot,
        replaced: Option<ProductId>,
    },
    /// The product is not wearable on the mannequin (an accessory).
    NoSlot,
}

/// Change notifications emitted by [`OutfitComposer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutfitEvent {
    SlotSelected { slot: OutfitSlot, id: ProductId },
    SlotCleared { slot: OutfitSlot },
}

/// The outfit being put together in the configurator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutfitComposer {
    outfit: Outfit,
    #[serde(skip)]
    observers: Observers<OutfitEvent>,
}

impl OutfitComposer {
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
        F: Fn(&OutfitEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    #[must_use]
    pub const fn outfit(&self) -> &Outfit {
        &self.outfit
    }

    /// Put `product` into its slot, replacing whatever was there.
    pub fn select_for_slot(&mut self, product: &Product) -> SlotSelection {
        let Some(slot) = product.outfit_slot() else {
            return SlotSelection::NoSlot;
        };

        let replaced = self
            .outfit
            .slot_mut(slot)
            .replace(product.clone())
            .map(|previous| previous.id);

        self.observers.notify(&OutfitEvent::SlotSelected {
            slot,
            id: product.id.clone(),
        });

        SlotSelection::Selected { slot, replaced }
    }

    /// Apply product ids returned by the suggestion service.
    ///
    /// The ids are untrusted: each one is resolved against `catalog` first and
    /// ids that resolve to nothing (or to products without a slot) are skipped.
    /// Returns how many distinct slots the suggestion filled. Two suggested
    /// products for the same slot count once; the later one wins.
    pub fn apply_suggestion<I>(&mut self, catalog: &Catalog, ids: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut filled = BTreeSet::new();
        for id in ids {
            let Some(product) = catalog.find(id.as_ref()) else {
                continue;
            };
            if let SlotSelection::Selected { slot, .. } = self.select_for_slot(product) {
                filled.insert(slot);
            }
        }
        filled.len()
    }

    /// Empty one slot, returning its previous occupant.
    pub fn clear_slot(&mut self, slot: OutfitSlot) -> Option<Product> {
        let previous = self.outfit.slot_mut(slot).take();
        if previous.is_some() {
            self.observers.notify(&OutfitEvent::SlotCleared { slot });
        }
        previous
    }

    /// Sum of price over the filled slots.
    #[must_use]
    pub fn total(&self) -> Price {
        self.outfit.total()
    }

    /// The filled slots' products, head to toe, ready for the cart.
    #[must_use]
    pub fn commit(&self) -> Vec<Product> {
        self.outfit.products().cloned().collect()
    }
}
