//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::instrument;
use vira_core::Product;

use crate::state::AppState;

/// How many related products the detail page shows.
const RELATED_LIMIT: usize = 4;

/// Product detail display data.
#[derive(Debug, Serialize)]
pub struct ProductDetailView {
    pub product: Product,
    pub default_size: Option<String>,
    pub related: Vec<Product>,
}

/// Display a product. Unknown ids go back to the shop.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let catalog = state.catalog();
    let Some(product) = catalog.find(&id) else {
        tracing::debug!("Unknown product, redirecting to shop");
        return Redirect::to("/shop").into_response();
    };

    Json(ProductDetailView {
        product: product.clone(),
        default_size: product.default_size().map(str::to_owned),
        related: catalog
            .related(product, RELATED_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
    })
    .into_response()
}
