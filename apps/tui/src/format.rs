//! Display strings for the rendering boundary.
//!
//! Values stay numeric everywhere else; these helpers are only called when a
//! cell, card or tooltip is drawn.

/// `$1,234.56`, with a leading `-` for negative amounts.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_decimal(&format!("{:.2}", value.abs())))
}

/// Whole number with thousands separators, e.g. `12,345`.
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Takes a value already scaled to percent, e.g. `5.0` -> `5.00%`.
pub fn format_percentage(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}%", group_decimal(&format!("{:.2}", value.abs())))
}

fn group_decimal(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => format!("{}.{fraction}", group_digits(whole)),
        None => group_digits(formatted),
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_two_decimals_and_grouping() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-950.0), "-$950.00");
    }

    #[test]
    fn numbers_are_grouped_without_decimals() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(3_000), "3,000");
        assert_eq!(format_count(0), "0");
    }

    #[test]
    fn percentages_keep_two_decimals() {
        assert_eq!(format_percentage(5.0), "5.00%");
        assert_eq!(format_percentage(12.345_6), "12.35%");
        assert_eq!(format_percentage(1234.5), "1,234.50%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }
}
