//! Checkout route handlers.
//!
//! Checkout is simulated: after a fixed delay every well-formed order
//! succeeds, gets an order number and empties the cart. Nothing is charged.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;
use vira_core::{DeliveryMethod, Email, OrderNumber, OrderPricing, PaymentMethod};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::cart::{CartView, load_cart, save_cart};
use crate::state::AppState;

/// Order summary shown before submitting.
#[derive(Debug, Serialize)]
pub struct CheckoutPreview {
    pub cart: CartView,
    pub pricing: OrderPricing,
    pub delivery_methods: [DeliveryMethod; 1],
    pub payment_methods: [PaymentMethod; 2],
}

/// Checkout form payload.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    #[serde(default)]
    pub delivery: DeliveryMethod,
    #[serde(default)]
    pub payment: PaymentMethod,
}

/// Validated contact details.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl CheckoutForm {
    /// Check every contact field.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first invalid field.
    pub fn validate(&self) -> Result<Contact> {
        let email = Email::parse(self.email.trim())
            .map_err(|e| AppError::BadRequest(format!("email: {e}")))?;

        Ok(Contact {
            email,
            first_name: required("first_name", &self.first_name)?,
            last_name: required("last_name", &self.last_name)?,
            address: required("address", &self.address)?,
            city: required("city", &self.city)?,
            zip: required("zip", &self.zip)?,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

/// A placed order.
#[derive(Debug, Serialize)]
pub struct OrderConfirmation {
    pub order_number: OrderNumber,
    pub placed_at: DateTime<Utc>,
    pub contact: Contact,
    pub delivery: DeliveryMethod,
    pub payment: PaymentMethod,
    pub cart: CartView,
    pub pricing: OrderPricing,
}

fn new_order_number() -> OrderNumber {
    let id = Uuid::new_v4().simple().to_string().to_uppercase();
    OrderNumber::new(format!("VIRA-{}", id.get(..8).unwrap_or(&id)))
}

/// Show the order summary. An empty cart goes back to the home page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Json(CheckoutPreview {
        pricing: OrderPricing::for_subtotal(cart.total()),
        cart: CartView::from(&cart),
        delivery_methods: [DeliveryMethod::Courier],
        payment_methods: [PaymentMethod::Card, PaymentMethod::Wallet],
    })
    .into_response())
}

/// Place the order.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }
    let contact = form.validate()?;

    tokio::time::sleep(state.config().checkout_delay).await;

    let confirmation = OrderConfirmation {
        order_number: new_order_number(),
        placed_at: Utc::now(),
        contact,
        delivery: form.delivery,
        payment: form.payment,
        pricing: OrderPricing::for_subtotal(cart.total()),
        cart: CartView::from(&cart),
    };

    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(
        order_number = %confirmation.order_number,
        total = %confirmation.pricing.total,
        "Order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", confirmation.order_number.as_str())]),
    );

    Ok(Json(confirmation).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            email: "jana@vira.cz".to_string(),
            first_name: "Jana".to_string(),
            last_name: "Nováková".to_string(),
            address: "Náměstí 1".to_string(),
            city: "Brno".to_string(),
            zip: "602 00".to_string(),
            delivery: DeliveryMethod::Courier,
            payment: PaymentMethod::Card,
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let contact = form().validate().unwrap();
        assert_eq!(contact.email.as_str(), "jana@vira.cz");
        assert_eq!(contact.city, "Brno");
    }

    #[test]
    fn test_validate_rejects_blank_field() {
        let mut form = form();
        form.city = "   ".to_string();

        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), "Bad request: city is required");
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut form = form();
        form.email = "jana".to_string();
        assert!(matches!(form.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_order_number_shape() {
        let number = new_order_number();
        assert!(number.as_str().starts_with("VIRA-"));
        assert_eq!(number.as_str().len(), 13);
    }
}
