//! 金额格式化

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Format a monetary amount with exactly two decimal places.
///
/// Goes through `Decimal` so `10.005` rounds bankers-style instead of
/// accumulating float noise in rendered documents.
pub fn format_amount(amount: f64) -> String {
    Decimal::from_f64(amount)
        .map(|d| format!("{:.2}", d.round_dp(2)))
        .unwrap_or_else(|| format!("{amount:.2}"))
}
