//! Checkout pricing.

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Orders strictly above this subtotal ship for free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::new(5000);

/// Flat courier fee below the free-shipping threshold.
pub const SHIPPING_FEE: Price = Price::new(129);

/// How the order is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Courier,
}

/// How the order is paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Wallet,
}

/// Subtotal, shipping and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPricing {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl OrderPricing {
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            Price::ZERO
        } else {
            SHIPPING_FEE
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_charged_at_threshold() {
        let pricing = OrderPricing::for_subtotal(Price::new(5000));
        assert_eq!(pricing.shipping, Price::new(129));
        assert_eq!(pricing.total, Price::new(5129));
    }

    #[test]
    fn test_shipping_free_above_threshold() {
        let pricing = OrderPricing::for_subtotal(Price::new(5001));
        assert!(pricing.is_free_shipping());
        assert_eq!(pricing.total, Price::new(5001));
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::from_str::<PaymentMethod>(r#""wallet""#).ok(),
            Some(PaymentMethod::Wallet)
        );
        assert!(serde_json::from_str::<DeliveryMethod>(r#""pickup""#).is_err());
    }
}
