//! USD formatting matching the `en-US` currency style used for displayed prices.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats `amount` as `$1,234.50`, rounding half-cents away from zero.
pub fn format_usd(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    let cents = rounded.mantissa();
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = group_thousands(cents / 100);
    format!("{sign}${dollars}.{:02}", cents % 100)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
