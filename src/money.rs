// 💵 Display formatting for amounts
// Stored values are never rounded; rounding happens here, at display time only.

use rust_decimal::{Decimal, RoundingStrategy};

/// "$15,000.00" (two places, midpoint away from zero, thousands separators)
pub fn format_currency(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}${}", sign, group_thousands(amount.abs(), 2))
}

/// "1,000" for share counts and other whole quantities
pub fn format_count(count: u64) -> String {
    group_thousands(Decimal::from(count), 0)
}

/// Plain number without trailing zeros ("3", "4.5")
pub fn format_plain(value: Decimal) -> String {
    value.normalize().to_string()
}

fn group_thousands(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", places as usize, rounded);

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}.{}", grouped, fraction),
        None => grouped,
    }
}
