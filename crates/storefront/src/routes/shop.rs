//! Shop listing route handler.
//!
//! The filter state is rebuilt from the query string on every request and
//! never stored. List parameters are comma-separated:
//!
//! ```text
//! GET /shop?category=men
//! GET /shop?categories=men,women&sizes=M,42&colors=black&min_price=1000&max_price=3000
//! ```

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vira_core::{Category, Color, Facets, FilterState, Price, Product};

use crate::state::AppState;

/// Shop query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    /// Navigation preselection (slug or Czech label).
    pub category: Option<String>,
    pub categories: Option<String>,
    pub brands: Option<String>,
    pub sizes: Option<String>,
    pub colors: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl ShopQuery {
    /// Build the filter state. Unrecognized categories and colors are ignored.
    #[must_use]
    pub fn to_filter(&self) -> FilterState {
        let mut filter = FilterState::with_category_preselection(self.category.as_deref());

        filter
            .categories
            .extend(list(self.categories.as_deref()).filter_map(Category::parse));
        filter
            .brands
            .extend(list(self.brands.as_deref()).map(str::to_owned));
        filter
            .sizes
            .extend(list(self.sizes.as_deref()).map(str::to_owned));
        filter
            .colors
            .extend(list(self.colors.as_deref()).filter_map(Color::parse));

        if let Some(min) = self.min_price {
            filter.set_price_lower(Price::new(min));
        }
        if let Some(max) = self.max_price {
            filter.set_price_upper(Price::new(max));
        }

        filter
    }
}

fn list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Shop listing display data.
#[derive(Debug, Serialize)]
pub struct ShopView {
    pub title: &'static str,
    pub filter: FilterState,
    pub facets: Facets,
    pub products: Vec<Product>,
    pub count: usize,
}

/// Display the filtered listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Json<ShopView> {
    let filter = query.to_filter();
    let products: Vec<Product> = state
        .filtered_products(&filter)
        .await
        .into_iter()
        .cloned()
        .collect();

    Json(ShopView {
        title: filter.listing_title(),
        facets: state.catalog().facets().clone(),
        count: products.len(),
        products,
        filter,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_unrestricted() {
        assert_eq!(ShopQuery::default().to_filter(), FilterState::default());
    }

    #[test]
    fn test_preselection_and_lists_combine() {
        let query = ShopQuery {
            category: Some("Ženy".to_string()),
            categories: Some("men, bogus".to_string()),
            sizes: Some("M,,42".to_string()),
            colors: Some("black,Béžová".to_string()),
            ..ShopQuery::default()
        };

        let filter = query.to_filter();
        assert_eq!(
            filter.categories.into_iter().collect::<Vec<_>>(),
            [Category::Men, Category::Women]
        );
        assert_eq!(filter.sizes.len(), 2);
        assert_eq!(
            filter.colors.into_iter().collect::<Vec<_>>(),
            [Color::Black, Color::Beige]
        );
    }

    #[test]
    fn test_price_bounds_stay_ordered() {
        let query = ShopQuery {
            min_price: Some(3000),
            max_price: Some(1000),
            ..ShopQuery::default()
        };

        let filter = query.to_filter();
        assert!(filter.price_range.lower() <= filter.price_range.upper());
        assert_eq!(filter.price_range.upper(), Price::new(1000));
    }
}
