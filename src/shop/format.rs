//! Money formatting and item-name normalization.

/// Glyphs stripped from item labels.
const DECORATIVE_QUOTES: &[char] = &['"', '«', '»'];

/// Format an amount with `.` between every group of three digits
/// (e.g. 1234567 → "1.234.567"). No currency symbol; callers append `$`.
pub fn format_money(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push('.');
        }
        result.push(c);
    }
    result
}

/// Parse a displayed price such as "1.500$" by dropping every non-digit.
/// `None` when no digits are left or the number does not fit in a `u64`.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Canonical item name: decorative quotes removed, surrounding whitespace trimmed.
pub fn normalize_item_name(label: &str) -> String {
    label
        .chars()
        .filter(|c| !DECORATIVE_QUOTES.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(1234567), "1.234.567");
        assert_eq!(format_money(2_000_000_000), "2.000.000.000");
        assert_eq!(format_money(1000), "1.000");
    }

    #[test]
    fn format_money_small_values_untouched() {
        assert_eq!(format_money(0), "0");
        assert_eq!(format_money(12), "12");
        assert_eq!(format_money(999), "999");
    }

    #[test]
    fn parse_price_strips_separators_and_symbol() {
        assert_eq!(parse_price("1.500$"), Some(1500));
        assert_eq!(parse_price(" 2.000.000.000 $ "), Some(2_000_000_000));
        assert_eq!(parse_price("Price: 42"), Some(42));
    }

    #[test]
    fn parse_price_without_digits_is_none() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price("free"), None);
    }

    #[test]
    fn parse_price_overflow_is_none() {
        assert_eq!(parse_price("99999999999999999999999"), None);
    }

    #[test]
    fn normalize_strips_quotes_and_whitespace() {
        assert_eq!(normalize_item_name("  \"Widget\" "), "Widget");
        assert_eq!(normalize_item_name("«Golden Boot»"), "Golden Boot");
        assert_eq!(normalize_item_name("Yacht"), "Yacht");
    }

    #[test]
    fn normalize_keeps_inner_spaces_and_other_quotes() {
        assert_eq!(normalize_item_name(" \"Madeira\" Villa "), "Madeira Villa");
        assert_eq!(normalize_item_name("'Single'"), "'Single'");
    }
}
