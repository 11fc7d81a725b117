//! Money helpers.
//!
//! Amounts are stored and summed as integer centavos. Decimal input from the
//! admin API goes through `rust_decimal` so no binary floating point ever
//! touches a stored value.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, Result, msg};

/// Convert a decimal amount (e.g. `29.90`) to centavos.
pub fn decimal_to_cents(amount: Decimal) -> Result<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::Validation(msg::NEGATIVE_PRICE.into()));
    }
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| AppError::Validation(msg::PRICE_OUT_OF_RANGE.into()))
}

pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Format centavos as Brazilian Real: `R$ 1.234,56`.
pub fn format_brl(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let units = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!(
        "{}R$ {},{:02}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}

/// Sum of `price * qty` with overflow reported instead of wrapping.
pub fn line_total(price_cents: i64, quantity: u32) -> Result<i64> {
    price_cents
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::Validation(msg::TOTAL_OVERFLOW.into()))
}
