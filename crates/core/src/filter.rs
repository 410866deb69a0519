//! Declarative product filtering.
//!
//! A [`FilterState`] describes what the visitor asked to see; [`FilterState::apply`]
//! derives the visible products from the catalog. The derivation is a pure,
//! stable filter: it never reorders and never touches anything but its inputs,
//! so callers are free to memoize on `FilterState` equality.
//!
//! An empty set on any dimension means "no restriction on that dimension".

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Category, Color, Product};
use crate::types::Price;

/// Canonical size ordering for the size facet.
///
/// Letter sizes first, then waist and shoe sizes, then hat sizes, with
/// one-size items last.
pub const SIZE_ORDER: &[&str] = &[
    "XS", "S", "S/M", "M", "L", "L/XL", "XL", "XXL", "30", "32", "34", "36", "37", "38", "39",
    "40", "41", "42", "43", "44", "45", "57", "59", "61", "One Size",
];

/// Upper bound of the price filter before the visitor touches it.
pub const DEFAULT_MAX_PRICE: Price = Price::new(10_000);

/// Title used when the listing is not narrowed to a single category.
pub const ALL_PRODUCTS_TITLE: &str = "Všechny produkty";

/// Error building a [`PriceRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("price range lower bound {lower} exceeds upper bound {upper}")]
pub struct PriceRangeError {
    pub lower: u64,
    pub upper: u64,
}

/// Inclusive price bounds with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u64; 2]", try_from = "[u64; 2]")]
pub struct PriceRange {
    lower: Price,
    upper: Price,
}

impl PriceRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns an error if `lower > upper`.
    pub const fn new(lower: Price, upper: Price) -> Result<Self, PriceRangeError> {
        if lower.amount() > upper.amount() {
            return Err(PriceRangeError {
                lower: lower.amount(),
                upper: upper.amount(),
            });
        }
        Ok(Self { lower, upper })
    }

    #[must_use]
    pub const fn lower(&self) -> Price {
        self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> Price {
        self.upper
    }

    /// Whether `price` lies within the bounds (inclusive on both ends).
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.lower <= price && price <= self.upper
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            lower: Price::ZERO,
            upper: DEFAULT_MAX_PRICE,
        }
    }
}

impl From<PriceRange> for [u64; 2] {
    fn from(range: PriceRange) -> Self {
        [range.lower.amount(), range.upper.amount()]
    }
}

impl TryFrom<[u64; 2]> for PriceRange {
    type Error = PriceRangeError;

    fn try_from([lower, upper]: [u64; 2]) -> Result<Self, Self::Error> {
        Self::new(Price::new(lower), Price::new(upper))
    }
}

/// The visitor's filter selection.
///
/// Lives for one listing visit: initialized from the navigation context and
/// changed by the filter controls. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub categories: BTreeSet<Category>,
    pub brands: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub colors: BTreeSet<Color>,
    pub price_range: PriceRange,
}

impl FilterState {
    /// Filter state for a listing reached through a navigation link.
    ///
    /// A recognized category name narrows the listing to that category;
    /// a missing or unrecognized value leaves every dimension unrestricted.
    #[must_use]
    pub fn with_category_preselection(raw: Option<&str>) -> Self {
        let mut state = Self::default();
        if let Some(category) = raw.and_then(Category::parse) {
            state.categories.insert(category);
        }
        state
    }

    /// Whether `product` satisfies every dimension of this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }
        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }
        if !self.colors.is_empty() && !self.colors.contains(&product.color) {
            return false;
        }
        if !self.sizes.is_empty() && !product.sizes.iter().any(|s| self.sizes.contains(s)) {
            return false;
        }
        self.price_range.contains(product.price)
    }

    /// Products that pass the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog
            .products()
            .iter()
            .filter(|p| self.matches(p))
            .collect()
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_brand(&mut self, brand: impl Into<String>) {
        toggle(&mut self.brands, brand.into());
    }

    pub fn toggle_size(&mut self, size: impl Into<String>) {
        toggle(&mut self.sizes, size.into());
    }

    pub fn toggle_color(&mut self, color: Color) {
        toggle(&mut self.colors, color);
    }

    /// Move the lower price bound, dragging the upper bound along if needed.
    pub fn set_price_lower(&mut self, lower: Price) {
        let upper = self.price_range.upper.max(lower);
        self.price_range = PriceRange { lower, upper };
    }

    /// Move the upper price bound, dragging the lower bound along if needed.
    pub fn set_price_upper(&mut self, upper: Price) {
        let lower = self.price_range.lower.min(upper);
        self.price_range = PriceRange { lower, upper };
    }

    /// Clear every selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Listing heading: the category label when exactly one is selected.
    #[must_use]
    pub fn listing_title(&self) -> &'static str {
        match (self.categories.len(), self.categories.first()) {
            (1, Some(category)) => category.label(),
            _ => ALL_PRODUCTS_TITLE,
        }
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

/// Filterable values offered by the catalog.
///
/// Computed once from the full catalog; independent of the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Distinct brands, ascending.
    pub brands: Vec<String>,
    /// Distinct colors, ascending by label.
    pub colors: Vec<Color>,
    /// Distinct sizes in canonical size order.
    pub sizes: Vec<String>,
}

impl Facets {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let brands: BTreeSet<&str> = products.iter().map(|p| p.brand.as_str()).collect();

        let mut colors: Vec<Color> = products
            .iter()
            .map(|p| p.color)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        colors.sort_by_key(|c| c.label());

        let mut sizes: Vec<String> = products
            .iter()
            .flat_map(|p| p.sizes.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        sizes.sort_by(|a, b| compare_sizes(a, b));

        Self {
            brands: brands.into_iter().map(str::to_owned).collect(),
            colors,
            sizes,
        }
    }
}

/// Order sizes by [`SIZE_ORDER`]; unknown sizes go last, lexically.
#[must_use]
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    size_rank(a).cmp(&size_rank(b)).then_with(|| a.cmp(b))
}

fn size_rank(size: &str) -> usize {
    SIZE_ORDER
        .iter()
        .position(|known| *known == size)
        .unwrap_or(SIZE_ORDER.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::ClothingType;
    use crate::catalog::fixtures::product;

    fn priced_catalog() -> Catalog {
        Catalog::new(vec![
            product("h1", ClothingType::Headwear, 850),
            product("t2", ClothingType::Top, 2490),
            product("b3", ClothingType::Bottom, 3500),
        ])
        .unwrap()
    }

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn varied_catalog() -> Catalog {
        let mut t1 = product("t1", ClothingType::Top, 890);
        t1.color = Color::White;
        t1.sizes = vec!["S".into(), "M".into(), "L".into(), "XL".into()];

        let mut t2 = product("t2", ClothingType::Top, 2490);
        t2.category = Category::Women;
        t2.color = Color::Beige;
        t2.sizes = vec!["XS".into(), "S".into()];

        let mut s1 = product("s1", ClothingType::Shoes, 2990);
        s1.brand = "Nike / VIRA".into();
        s1.color = Color::White;
        s1.sizes = vec!["41".into(), "42".into()];

        let mut h1 = product("h1", ClothingType::Headwear, 850);
        h1.category = Category::Accessories;
        h1.sizes = vec!["One Size".into()];

        Catalog::new(vec![t1, t2, s1, h1]).unwrap()
    }

    #[test]
    fn test_price_range_scenario() {
        let catalog = priced_catalog();
        let mut state = FilterState::default();
        state.price_range = PriceRange::new(Price::new(1000), Price::new(3000)).unwrap();

        assert_eq!(ids(&state.apply(&catalog)), ["t2"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let catalog = priced_catalog();
        let mut state = FilterState::default();
        state.price_range = PriceRange::new(Price::new(850), Price::new(2490)).unwrap();

        assert_eq!(ids(&state.apply(&catalog)), ["h1", "t2"]);
    }

    #[test]
    fn test_empty_state_returns_whole_catalog_in_order() {
        let catalog = varied_catalog();
        let result = FilterState::default().apply(&catalog);
        assert_eq!(ids(&result), ["t1", "t2", "s1", "h1"]);
    }

    #[test]
    fn test_result_is_ordered_subset() {
        let catalog = varied_catalog();
        let mut state = FilterState::default();
        state.toggle_color(Color::White);

        let result = state.apply(&catalog);
        let positions: Vec<usize> = result
            .iter()
            .map(|p| catalog.products().iter().position(|c| c.id == p.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids(&result), ["t1", "s1"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let catalog = varied_catalog();
        let mut state = FilterState::default();
        state.toggle_size("S");
        state.toggle_category(Category::Women);

        assert_eq!(state.apply(&catalog), state.apply(&catalog));
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let catalog = varied_catalog();
        let mut state = FilterState::default();
        state.toggle_color(Color::White);
        state.toggle_brand("VIRA");

        assert_eq!(ids(&state.apply(&catalog)), ["t1"]);
    }

    #[test]
    fn test_size_filter_matches_any_intersection() {
        let catalog = varied_catalog();
        let mut state = FilterState::default();
        state.toggle_size("XS");
        state.toggle_size("42");

        assert_eq!(ids(&state.apply(&catalog)), ["t2", "s1"]);
    }

    #[test]
    fn test_toggle_twice_restores_unrestricted() {
        let mut state = FilterState::default();
        state.toggle_brand("VIRA");
        state.toggle_brand("VIRA");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_category_preselection() {
        let state = FilterState::with_category_preselection(Some("Ženy"));
        assert_eq!(
            state.categories.iter().copied().collect::<Vec<_>>(),
            [Category::Women]
        );
        assert_eq!(state.listing_title(), "Ženy");

        let state = FilterState::with_category_preselection(Some("sale"));
        assert!(state.categories.is_empty());
        assert_eq!(state.listing_title(), ALL_PRODUCTS_TITLE);
    }

    #[test]
    fn test_price_setters_keep_bounds_ordered() {
        let mut state = FilterState::default();
        state.set_price_lower(Price::new(12_000));
        assert_eq!(state.price_range.lower(), Price::new(12_000));
        assert_eq!(state.price_range.upper(), Price::new(12_000));

        state.set_price_upper(Price::new(500));
        assert_eq!(state.price_range.lower(), Price::new(500));
        assert_eq!(state.price_range.upper(), Price::new(500));
    }

    #[test]
    fn test_price_range_rejects_inverted_bounds() {
        assert!(PriceRange::new(Price::new(10), Price::new(5)).is_err());
        assert!(serde_json::from_str::<PriceRange>("[10, 5]").is_err());
        let range: PriceRange = serde_json::from_str("[5, 10]").unwrap();
        assert!(range.contains(Price::new(10)));
    }

    #[test]
    fn test_facets_ignore_selection_and_dedupe() {
        let catalog = varied_catalog();
        let facets = catalog.facets();

        assert_eq!(facets.brands, ["Nike / VIRA", "VIRA"]);
        assert_eq!(facets.colors, [Color::Beige, Color::White, Color::Black]);
        assert_eq!(facets.sizes, ["XS", "S", "M", "L", "XL", "41", "42", "One Size"]);
    }

    #[test]
    fn test_unknown_sizes_sort_last() {
        let mut sizes = vec!["W31", "M", "One Size", "W28"];
        sizes.sort_by(|a, b| compare_sizes(a, b));
        assert_eq!(sizes, ["M", "One Size", "W28", "W31"]);
    }
}
