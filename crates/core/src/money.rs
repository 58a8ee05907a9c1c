//! Money
//!
//! Prices are held as [`Decimal`] major units and only converted to
//! [`Money`] for display.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// Currency every catalog price is quoted in.
pub fn currency() -> &'static Currency {
    iso::USD
}

/// Convert a decimal amount into [`Money`] in the catalog currency.
///
/// Returns `None` if the amount does not fit in minor units.
pub fn to_money(amount: Decimal) -> Option<Money<'static, Currency>> {
    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())?;

    Some(Money::from_minor(minor_units, currency()))
}

/// Format an amount for display, e.g. `$999.99`.
pub fn format_amount(amount: Decimal) -> String {
    to_money(amount).map_or_else(|| amount.to_string(), |money| money.to_string())
}
