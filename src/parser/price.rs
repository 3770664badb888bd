//! Price text handling for listing cards.
//!
//! Everything here is total: malformed input becomes [`Extracted::Malformed`]
//! or [`Extracted::Missing`], never a panic or an error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::selectors;
use crate::types::Extracted;

/// First run of digits with optional `,` thousands groups. Lakh grouping
/// (`1,23,999`) only matches the leading `1`.
static PRICE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:,\d{3})*").expect("static price regex"));

/// Parses the text of the current-price element (`a-price-whole`).
///
/// The element renders as `1,299.` because the decimal point lives in a
/// nested span; the trailing point is dropped, then thousands separators.
pub fn parse_whole_price(text: &str) -> Extracted<i64> {
    let trimmed = text.trim();
    let digits = trimmed.strip_suffix('.').unwrap_or(trimmed).replace(',', "");
    match digits.parse::<i64>() {
        Ok(v) => Extracted::Value(v),
        Err(_) => Extracted::Malformed(trimmed.to_string()),
    }
}

/// Pulls the first digit group out of an offscreen price like `₹2,499.00`.
pub fn parse_offscreen_price(text: &str) -> Extracted<i64> {
    let Some(m) = PRICE_DIGITS.find(text) else {
        return Extracted::Malformed(text.trim().to_string());
    };
    match m.as_str().replace(',', "").parse::<i64>() {
        Ok(v) => Extracted::Value(v),
        Err(_) => Extracted::Malformed(m.as_str().to_string()),
    }
}

/// Original-price heuristic: of all offscreen price spans in a card, the
/// **second** is the struck-through list price. The first repeats the current
/// price. Fragile against layout changes; kept isolated so it can be swapped.
pub fn original_price_text(card: ElementRef<'_>) -> Option<String> {
    card.select(&selectors::OFFSCREEN_PRICE)
        .nth(1)
        .map(|e| e.text().collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn whole_price_strips_separators_and_trailing_point() {
        assert_eq!(parse_whole_price("1,299."), Extracted::Value(1299));
        assert_eq!(parse_whole_price(" 12,34,567 "), Extracted::Value(1234567));
        assert_eq!(parse_whole_price("499"), Extracted::Value(499));
    }

    #[test]
    fn whole_price_malformed() {
        assert!(matches!(parse_whole_price("N/A"), Extracted::Malformed(_)));
        assert!(matches!(parse_whole_price(""), Extracted::Malformed(_)));
        assert!(matches!(parse_whole_price("12.50"), Extracted::Malformed(_)));
    }

    #[test]
    fn offscreen_price_takes_first_digit_group() {
        assert_eq!(parse_offscreen_price("₹2,499.00"), Extracted::Value(2499));
        assert_eq!(parse_offscreen_price("₹12,999"), Extracted::Value(12999));
        assert_eq!(parse_offscreen_price("M.R.P: ₹999"), Extracted::Value(999));
        assert_eq!(parse_offscreen_price("₹1,23,999"), Extracted::Value(1));
        assert!(matches!(parse_offscreen_price("no price"), Extracted::Malformed(_)));
    }

    #[test]
    fn original_price_is_second_offscreen_span() {
        let html = Html::parse_fragment(
            r#"<div class="card">
                 <span class="a-offscreen">₹499</span>
                 <span class="a-offscreen">₹1,999</span>
                 <span class="a-offscreen">₹5</span>
               </div>"#,
        );
        let card = html
            .select(&scraper::Selector::parse("div.card").unwrap())
            .next()
            .unwrap();
        assert_eq!(original_price_text(card).as_deref(), Some("₹1,999"));
    }

    #[test]
    fn single_offscreen_span_has_no_original_price() {
        let html = Html::parse_fragment(
            r#"<div class="card"><span class="a-offscreen">₹499</span></div>"#,
        );
        let card = html
            .select(&scraper::Selector::parse("div.card").unwrap())
            .next()
            .unwrap();
        assert_eq!(original_price_text(card), None);
    }
}
