//! Fixed-decimal amount rendering and digit-only identifiers.

use rust_decimal::{Decimal, RoundingStrategy};

fn fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.*}", places as usize, rounded)
}

/// Monetary amount with exactly two decimals, no grouping and no symbol.
pub fn format_amount(value: Decimal) -> String {
    fixed(value, 2)
}

/// Unit count with exactly three decimals.
pub fn format_quantity(value: Decimal) -> String {
    fixed(value, 3)
}

fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Zip code as 5 or 9 digits; short values are right-padded with zeros.
pub fn format_zip(raw: &str) -> String {
    let digits = digits(raw);
    match digits.len() {
        0 => String::new(),
        n if n >= 9 => digits[..9].to_string(),
        n if n >= 5 => digits[..5].to_string(),
        _ => format!("{digits:0<5}"),
    }
}

/// Ten-digit phone number, dropping a leading US country code.
pub fn format_phone(raw: &str) -> String {
    let digits = digits(raw);
    match digits.len() {
        0 => String::new(),
        10 => digits,
        11 if digits.starts_with('1') => digits[1..].to_string(),
        _ => {
            let head: String = digits.chars().take(10).collect();
            format!("{head:0<10}")
        }
    }
}
