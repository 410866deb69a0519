//! The product catalog.
//!
//! The catalog is loaded once at startup and never mutated afterwards. It is
//! the single source of truth for every derived view: listings, facets, cart
//! and outfit lookups all resolve product ids against it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::filter::Facets;
use crate::types::{Price, ProductId};

/// Errors raised while building a [`Catalog`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog source is not valid JSON for a product list.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A product has an empty id.
    #[error("product at position {position} has an empty id")]
    EmptyId {
        /// Zero-based position in the source list.
        position: usize,
    },
    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    /// A product lists no sizes.
    #[error("product {0} has no sizes")]
    NoSizes(ProductId),
}

/// Top-level department a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Accessories,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 3] = [Self::Men, Self::Women, Self::Accessories];

    /// URL-safe identifier.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Accessories => "accessories",
        }
    }

    /// Label shown in navigation and listing titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Men => "Muži",
            Self::Women => "Ženy",
            Self::Accessories => "Doplňky",
        }
    }

    /// Parse a category from either its slug (any case) or its label.
    ///
    /// Navigation links carry the label, API clients tend to send the slug;
    /// anything else is not a category.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(raw) || c.label() == raw)
    }
}

/// The four positions of an outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitSlot {
    Headwear,
    Top,
    Bottom,
    Shoes,
}

impl OutfitSlot {
    /// Slots in head-to-toe order.
    pub const ALL: [Self; 4] = [Self::Headwear, Self::Top, Self::Bottom, Self::Shoes];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Headwear => "headwear",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Shoes => "shoes",
        }
    }

    /// Configurator step label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Headwear => "Hlava",
            Self::Top => "Svršek",
            Self::Bottom => "Spodek",
            Self::Shoes => "Obuv",
        }
    }
}

/// What kind of garment a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingType {
    Headwear,
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl ClothingType {
    /// The outfit position this garment occupies, if any.
    ///
    /// Accessories are sold in the shop but have no place on the mannequin.
    #[must_use]
    pub const fn outfit_slot(self) -> Option<OutfitSlot> {
        match self {
            Self::Headwear => Some(OutfitSlot::Headwear),
            Self::Top => Some(OutfitSlot::Top),
            Self::Bottom => Some(OutfitSlot::Bottom),
            Self::Shoes => Some(OutfitSlot::Shoes),
            Self::Accessory => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Headwear => "headwear",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Shoes => "shoes",
            Self::Accessory => "accessory",
        }
    }
}

/// Product color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Grey,
    Blue,
    Beige,
    Brown,
    Green,
    Red,
    Multi,
}

impl Color {
    pub const ALL: [Self; 9] = [
        Self::Black,
        Self::White,
        Self::Grey,
        Self::Blue,
        Self::Beige,
        Self::Brown,
        Self::Green,
        Self::Red,
        Self::Multi,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Grey => "grey",
            Self::Blue => "blue",
            Self::Beige => "beige",
            Self::Brown => "brown",
            Self::Green => "green",
            Self::Red => "red",
            Self::Multi => "multi",
        }
    }

    /// Label shown in the color facet.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Black => "Černá",
            Self::White => "Bílá",
            Self::Grey => "Šedá",
            Self::Blue => "Modrá",
            Self::Beige => "Béžová",
            Self::Brown => "Hnědá",
            Self::Green => "Zelená",
            Self::Red => "Červená",
            Self::Multi => "Multi",
        }
    }

    /// Parse from the identifier or the label.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw) || c.label() == raw)
    }
}

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: Category,
    #[serde(rename = "type")]
    pub clothing_type: ClothingType,
    pub brand: String,
    /// Size labels in the order the product page offers them.
    pub sizes: Vec<String>,
    pub color: Color,
    pub image: String,
    pub description: String,
}

impl Product {
    /// Outfit slot this product fills, if any.
    #[must_use]
    pub const fn outfit_slot(&self) -> Option<OutfitSlot> {
        self.clothing_type.outfit_slot()
    }

    /// Size preselected on the product page.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }
}

/// The read-only product catalog.
///
/// Holds products in their defined order plus an id index and the facets
/// derived from the full product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    facets: Facets,
}

impl Catalog {
    /// Build a catalog from products in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is empty or repeated, or a product has no sizes.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            if product.id.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyId { position });
            }
            if product.sizes.is_empty() {
                return Err(CatalogError::NoSizes(product.id.clone()));
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        let facets = Facets::from_products(&products);

        Ok(Self {
            products,
            index,
            facets,
        })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the products are invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    /// Look up a product by raw id string.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.get(&ProductId::from(id))
    }

    /// Facets derived from the full catalog.
    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Products that can fill `slot`, in catalog order.
    pub fn products_for_slot(&self, slot: OutfitSlot) -> impl Iterator<Item = &Product> {
        self.products
            .iter()
            .filter(move |p| p.outfit_slot() == Some(slot))
    }

    /// Other products from the same category, in catalog order.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a product with sensible defaults for tests.
    pub fn product(id: &str, clothing_type: ClothingType, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(price),
            category: Category::Men,
            clothing_type,
            brand: "VIRA".to_string(),
            sizes: vec!["M".to_string()],
            color: Color::Black,
            image: format!("/images/{id}.jpg"),
            description: String::new(),
        }
    }
}
