//! Cart route handlers.
//!
//! The cart ledger is stored in the session. Each mutation loads it, applies
//! one ledger operation and writes it back. Responses carry the recomputed
//! cart together with `open_cart`, set when the ledger asked for the cart
//! drawer to be shown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vira_core::{CartEntry, CartEvent, CartLedger, Price, Product, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{self, session_keys};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            product: entry.product.clone(),
            quantity: entry.quantity,
            line_total: entry.line_total(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Price,
    pub item_count: u64,
}

impl From<&CartLedger> for CartView {
    fn from(ledger: &CartLedger) -> Self {
        Self {
            items: ledger.entries().iter().map(CartItemView::from).collect(),
            total: ledger.total(),
            item_count: ledger.item_count(),
        }
    }
}

/// Response to a cart mutation.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    pub open_cart: bool,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart payload.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity payload.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i64,
}

/// Remove from cart payload.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart ledger from the session.
pub(crate) async fn load_cart(session: &Session) -> Result<CartLedger> {
    Ok(models::load(session, session_keys::CART).await?)
}

/// Save the cart ledger to the session.
pub(crate) async fn save_cart(session: &Session, cart: &CartLedger) -> Result<()> {
    Ok(models::store(session, session_keys::CART, cart).await?)
}

/// Watch `cart` for a request to show the cart drawer.
pub(crate) fn watch_open_requests(cart: &mut CartLedger) -> Result<Arc<AtomicBool>> {
    let requested = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&requested);
    cart.subscribe(move |event| {
        if *event == CartEvent::OpenRequested {
            flag.store(true, Ordering::Relaxed);
        }
    })
    .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(requested)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartResponse>> {
    let product = state
        .catalog()
        .get(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = load_cart(&session).await?;
    let open = watch_open_requests(&mut cart)?;
    cart.add(product, form.quantity.unwrap_or(1));
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );

    Ok(Json(CartResponse {
        cart: CartView::from(&cart),
        open_cart: open.load(Ordering::Relaxed),
    }))
}

/// Change a line's quantity by a delta. Unknown products are ignored.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await?;
    cart.adjust_quantity(&form.product_id, form.delta);
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse {
        cart: CartView::from(&cart),
        open_cart: false,
    }))
}

/// Remove a line regardless of quantity. Unknown products are ignored.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartResponse>> {
    let mut cart = load_cart(&session).await?;
    if cart.remove(&form.product_id) {
        save_cart(&session, &cart).await?;
    }

    Ok(Json(CartResponse {
        cart: CartView::from(&cart),
        open_cart: false,
    }))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}
