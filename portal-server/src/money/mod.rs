//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted
//! to `f64` for storage/serialization. One rounding policy applies
//! everywhere: half-up to 2 decimal places.

use rust_decimal::prelude::*;
use shared::models::{PricedLine, Quotation};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed monetary amount
const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Validation failure for a monetary input
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AmountError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} exceeds maximum allowed ({max}), got {value}")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },
}

/// Validate that a monetary amount is finite, positive and bounded
pub fn validate_amount(value: f64, field: &'static str) -> Result<(), AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(AmountError::NotPositive { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(AmountError::TooLarge {
            field,
            value,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be validated at the boundary. If NaN/Infinity
/// somehow reaches here, logs an error and returns ZERO to avoid
/// silent data corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with bounded inputs is always
        // within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Round to the monetary precision (2dp, half-up)
#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Line total: unit price x quantity, missing values contribute zero
pub fn line_total(unit_price: Option<f64>, quantity: Option<f64>) -> Decimal {
    let price = unit_price.map(to_decimal).unwrap_or(Decimal::ZERO);
    let qty = quantity.map(to_decimal).unwrap_or(Decimal::ZERO);
    round_money(price * qty)
}

/// Sum of line totals over one collection of priced lines
pub fn lines_subtotal<L: PricedLine>(lines: &[L]) -> Decimal {
    lines
        .iter()
        .map(|l| line_total(l.unit_price(), l.quantity()))
        .sum()
}

/// Subtotal over service items and other (activity) items
pub fn subtotal<A: PricedLine, B: PricedLine>(items: &[A], other_items: &[B]) -> Decimal {
    round_money(lines_subtotal(items) + lines_subtotal(other_items))
}

/// VAT amount for a subtotal at the given percentage
pub fn vat_amount(subtotal: Decimal, vat_percentage: f64) -> Decimal {
    round_money(subtotal * to_decimal(vat_percentage) / Decimal::ONE_HUNDRED)
}

/// Grand total: subtotal plus VAT
pub fn grand_total(subtotal: Decimal, vat: Decimal) -> Decimal {
    round_money(subtotal + vat)
}

/// Remaining balance, clamped at zero
pub fn remaining(total: Decimal, paid: Decimal) -> Decimal {
    round_money((total - paid).max(Decimal::ZERO))
}

/// Fixed advance amount for a grand total at the given percentage
pub fn advance_amount(grand_total: f64, advance_percentage: f64) -> Decimal {
    round_money(to_decimal(grand_total) * to_decimal(advance_percentage) / Decimal::ONE_HUNDRED)
}

/// Check whether a paid amount settles the required total
///
/// Returns true if paid >= required - 0.01
pub fn is_settled(paid: Decimal, required: Decimal) -> bool {
    paid >= required - MONEY_TOLERANCE
}

/// Recalculate a quotation's stored subtotal and grand total from its
/// line items
pub fn recalculate_totals(quotation: &mut Quotation) {
    let sub = subtotal(&quotation.items, &quotation.other_items);
    let vat = vat_amount(sub, quotation.vat_percentage);
    quotation.subtotal = to_f64(sub);
    quotation.grand_total = to_f64(grand_total(sub, vat));
}
