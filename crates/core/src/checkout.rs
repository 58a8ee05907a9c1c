//! Checkout
//!
//! Checkout turns a cart's reservations into a [`Purchase`]. Stock was taken
//! when the items entered the cart, so it is not touched again here.

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartError},
    catalog::Catalog,
    orders::{OrderHistory, Purchase},
    payment::PaymentDetails,
};

/// Errors raised during checkout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing in the cart to buy.
    #[error("your cart is empty")]
    EmptyCart,

    /// The customer did not confirm their delivery address.
    #[error("address not confirmed, checkout cancelled")]
    Declined,

    /// The cart could not be priced.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Everything the customer supplies to complete a purchase.
#[derive(Debug)]
pub struct Confirmation {
    /// Validated card details
    pub payment: PaymentDetails,

    /// Whether the delivery address on file was confirmed
    pub address_confirmed: bool,

    /// Free text feedback stored with the purchase
    pub feedback: String,
}

pub(crate) fn checkout(
    cart: &mut Cart,
    history: &mut OrderHistory,
    catalog: &Catalog,
    confirmation: Confirmation,
    at: Timestamp,
) -> Result<Purchase, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if !confirmation.address_confirmed {
        return Err(CheckoutError::Declined);
    }

    let quote = cart.quote(catalog)?;

    let purchase = Purchase {
        date: at,
        items: quote.items,
        total_price: quote.total,
        feedback: confirmation.feedback,
    };

    cart.clear();
    history.record(purchase.clone());

    info!(
        items = purchase.items.len(),
        total = %purchase.total_price,
        card = %confirmation.payment.masked_card_number(),
        "checked out"
    );

    Ok(purchase)
}
