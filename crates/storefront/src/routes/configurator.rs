//! Outfit configurator route handlers.
//!
//! The outfit in progress and the wizard step are stored in the session
//! under separate keys. Every handler answers with the full configurator
//! view so a client never has to track state of its own.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vira_core::{
    Catalog, Outfit, OutfitComposer, Price, Product, ProductId, SlotSelection, Wizard, WizardStep,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{self, session_keys};
use crate::routes::cart::{CartResponse, CartView, load_cart, save_cart, watch_open_requests};
use crate::services::suggest_or_empty;
use crate::state::AppState;

/// Configurator display data.
#[derive(Debug, Serialize)]
pub struct ConfiguratorView {
    pub step: WizardStep,
    pub step_number: usize,
    pub step_count: usize,
    pub label: &'static str,
    /// Products offered for the current step (empty on the summary).
    pub options: Vec<Product>,
    pub outfit: Outfit,
    pub total: Price,
    pub can_commit: bool,
}

impl ConfiguratorView {
    fn new(catalog: &Catalog, wizard: &Wizard, composer: &OutfitComposer) -> Self {
        let step = wizard.step();
        let options = step
            .slot()
            .map(|slot| catalog.products_for_slot(slot).cloned().collect())
            .unwrap_or_default();

        Self {
            step,
            step_number: wizard.step_number(),
            step_count: Wizard::STEP_COUNT,
            label: step.label(),
            options,
            outfit: composer.outfit().clone(),
            total: composer.total(),
            can_commit: wizard.can_commit(composer.outfit()),
        }
    }
}

/// Response to a product selection.
#[derive(Debug, Serialize)]
pub struct SelectResponse {
    /// False when the product has no outfit slot.
    pub placed: bool,
    pub replaced: Option<ProductId>,
    pub configurator: ConfiguratorView,
}

/// Response to a suggestion request.
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    /// How many suggested products were placed; zero means nothing changed.
    pub applied: usize,
    pub reasoning: String,
    pub configurator: ConfiguratorView,
}

/// Select payload.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub product_id: ProductId,
}

/// Suggest payload.
#[derive(Debug, Deserialize)]
pub struct SuggestForm {
    pub prompt: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_state(session: &Session) -> Result<(Wizard, OutfitComposer)> {
    let wizard = models::load(session, session_keys::WIZARD).await?;
    let composer = models::load(session, session_keys::OUTFIT).await?;
    Ok((wizard, composer))
}

async fn save_outfit(session: &Session, composer: &OutfitComposer) -> Result<()> {
    Ok(models::store(session, session_keys::OUTFIT, composer).await?)
}

async fn save_wizard(session: &Session, wizard: &Wizard) -> Result<()> {
    Ok(models::store(session, session_keys::WIZARD, wizard).await?)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the configurator.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ConfiguratorView>> {
    let (wizard, composer) = load_state(&session).await?;
    Ok(Json(ConfiguratorView::new(
        state.catalog(),
        &wizard,
        &composer,
    )))
}

/// Put a product into its outfit slot.
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SelectForm>,
) -> Result<Json<SelectResponse>> {
    let catalog = state.catalog();
    let product = catalog
        .get(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let (wizard, mut composer) = load_state(&session).await?;
    let (placed, replaced) = match composer.select_for_slot(product) {
        SlotSelection::Selected { replaced, .. } => (true, replaced),
        SlotSelection::NoSlot => (false, None),
    };
    if placed {
        save_outfit(&session, &composer).await?;
    }

    Ok(Json(SelectResponse {
        placed,
        replaced,
        configurator: ConfiguratorView::new(catalog, &wizard, &composer),
    }))
}

/// Advance the wizard.
#[instrument(skip(state, session))]
pub async fn next(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ConfiguratorView>> {
    let (mut wizard, composer) = load_state(&session).await?;
    wizard.next();
    save_wizard(&session, &wizard).await?;
    Ok(Json(ConfiguratorView::new(
        state.catalog(),
        &wizard,
        &composer,
    )))
}

/// Step the wizard back.
#[instrument(skip(state, session))]
pub async fn back(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ConfiguratorView>> {
    let (mut wizard, composer) = load_state(&session).await?;
    wizard.back();
    save_wizard(&session, &wizard).await?;
    Ok(Json(ConfiguratorView::new(
        state.catalog(),
        &wizard,
        &composer,
    )))
}

/// Ask the suggestion service for an outfit and apply what it proposes.
///
/// Failures are logged and reported as `applied: 0`.
#[instrument(skip(state, session))]
pub async fn suggest(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SuggestForm>,
) -> Result<Json<SuggestResponse>> {
    let catalog = state.catalog();
    let suggestion = suggest_or_empty(state.suggester(), &form.prompt, catalog).await;

    let (wizard, mut composer) = load_state(&session).await?;
    let applied = composer.apply_suggestion(catalog, &suggestion.selected_product_ids);
    if applied > 0 {
        save_outfit(&session, &composer).await?;
    }
    tracing::info!(
        suggested = suggestion.selected_product_ids.len(),
        applied,
        "Suggestion applied"
    );

    Ok(Json(SuggestResponse {
        applied,
        reasoning: suggestion.reasoning,
        configurator: ConfiguratorView::new(catalog, &wizard, &composer),
    }))
}

/// Move the finished outfit into the cart.
///
/// Only allowed from the summary step with at least one slot filled.
#[instrument(skip(session))]
pub async fn commit(session: Session) -> Result<Json<CartResponse>> {
    let (wizard, composer) = load_state(&session).await?;
    if !wizard.is_summary() {
        return Err(AppError::Conflict(
            "outfit can only be committed from the summary".to_string(),
        ));
    }
    if !wizard.can_commit(composer.outfit()) {
        return Err(AppError::Conflict("outfit is empty".to_string()));
    }

    let products = composer.commit();
    let mut cart = load_cart(&session).await?;
    let open = watch_open_requests(&mut cart)?;
    cart.add_all(&products);
    save_cart(&session, &cart).await?;

    add_breadcrumb("configurator", "Outfit added to cart", None);

    Ok(Json(CartResponse {
        cart: CartView::from(&cart),
        open_cart: open.load(std::sync::atomic::Ordering::Relaxed),
    }))
}
